//! Frame-driven generation pacing with a banked-time accumulator

use super::frame::{Frame, FrameHandle, FrameSource};
use super::speed::{SpeedStep, SpeedTable};
use crate::error::SimError;
use crate::game_of_life::{AdvanceResult, GenerationEngine, Grid};
use std::time::Duration;

/// Most generations a single frame may run before banked time is dropped
pub const DEFAULT_MAX_CATCH_UP_STEPS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Stopped,
    Running,
}

/// Paces `GenerationEngine::advance` at the selected speed step.
///
/// Elapsed time between frames is banked; each frame spends whole intervals
/// from the bank, so the generation rate does not depend on the frame rate.
#[derive(Debug)]
pub struct AnimationScheduler<F: FrameSource> {
    frames: F,
    state: SchedulerState,
    speeds: SpeedTable,
    speed_index: usize,
    accumulated: Duration,
    last_timestamp: Duration,
    pending: Option<FrameHandle>,
    max_catch_up_steps: usize,
}

impl<F: FrameSource> AnimationScheduler<F> {
    /// Create a stopped scheduler at `initial_index` in the speed table
    pub fn new(frames: F, speeds: SpeedTable, initial_index: usize) -> Result<Self, SimError> {
        speeds.check_index(initial_index)?;

        Ok(Self {
            frames,
            state: SchedulerState::Stopped,
            speeds,
            speed_index: initial_index,
            accumulated: Duration::ZERO,
            last_timestamp: Duration::ZERO,
            pending: None,
            max_catch_up_steps: DEFAULT_MAX_CATCH_UP_STEPS,
        })
    }

    pub fn with_max_catch_up_steps(mut self, steps: usize) -> Self {
        self.max_catch_up_steps = steps.max(1);
        self
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SchedulerState::Running
    }

    pub fn accumulated(&self) -> Duration {
        self.accumulated
    }

    pub fn interval(&self) -> Duration {
        self.speed().interval()
    }

    pub fn speed(&self) -> &SpeedStep {
        &self.speeds.steps()[self.speed_index]
    }

    pub fn speed_index(&self) -> usize {
        self.speed_index
    }

    pub fn speeds(&self) -> &SpeedTable {
        &self.speeds
    }

    pub fn frames(&self) -> &F {
        &self.frames
    }

    pub fn frames_mut(&mut self) -> &mut F {
        &mut self.frames
    }

    /// Begin running; returns `false` if already running
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            return false;
        }

        self.state = SchedulerState::Running;
        self.accumulated = Duration::ZERO;
        self.last_timestamp = self.frames.now();
        self.pending = Some(self.frames.request_frame());
        log::debug!("scheduler started at {} ms interval", self.speed().interval_ms);
        true
    }

    /// Stop running and cancel the outstanding frame; returns `false` if already stopped
    pub fn stop(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }

        self.state = SchedulerState::Stopped;
        if let Some(handle) = self.pending.take() {
            self.frames.cancel_frame(handle);
        }
        log::debug!("scheduler stopped");
        true
    }

    pub fn toggle(&mut self) -> SchedulerState {
        if self.is_running() {
            self.stop();
        } else {
            self.start();
        }
        self.state
    }

    /// Stop if running, then advance exactly one generation
    pub fn step(&mut self, engine: &mut GenerationEngine) -> AdvanceResult {
        self.stop();
        engine.advance()
    }

    /// Handle a delivered frame.
    ///
    /// Frames that arrive while stopped, or that are not the outstanding
    /// request, are ignored. `on_advance` sees the grid after each generation.
    /// Returns the number of generations run.
    pub fn on_frame<C>(
        &mut self,
        frame: Frame,
        engine: &mut GenerationEngine,
        on_advance: C,
    ) -> usize
    where
        C: FnMut(&Grid, &AdvanceResult),
    {
        self.on_frame_limited(frame, engine, usize::MAX, on_advance)
    }

    /// Like [`on_frame`](Self::on_frame), but runs at most `max_steps`
    /// generations. Banked time left over by the limit is kept.
    pub fn on_frame_limited<C>(
        &mut self,
        frame: Frame,
        engine: &mut GenerationEngine,
        max_steps: usize,
        mut on_advance: C,
    ) -> usize
    where
        C: FnMut(&Grid, &AdvanceResult),
    {
        if !self.is_running() || self.pending != Some(frame.handle) {
            log::trace!("ignoring stale frame {:?}", frame.handle);
            return 0;
        }
        self.pending = None;

        self.accumulated += frame.timestamp.saturating_sub(self.last_timestamp);
        self.last_timestamp = frame.timestamp;

        let interval = self.interval();
        let mut steps = 0;
        while self.accumulated >= interval && steps < max_steps {
            if steps == self.max_catch_up_steps {
                let nanos = interval.as_nanos();
                let skipped = self.accumulated.as_nanos() / nanos;
                log::warn!(
                    "frame fell {} generations behind; dropping banked time",
                    skipped
                );
                let remainder = self.accumulated.as_nanos() % nanos;
                self.accumulated = Duration::from_nanos(remainder as u64);
                break;
            }

            let result = engine.advance();
            on_advance(engine.grid(), &result);
            self.accumulated -= interval;
            steps += 1;
        }

        self.pending = Some(self.frames.request_frame());
        steps
    }

    /// Select a speed step by index; out-of-range indices are ignored
    pub fn set_speed(&mut self, index: usize) -> bool {
        match self.speeds.check_index(index) {
            Ok(step) => {
                log::info!("speed set to {} ({} ms)", step.label, step.interval_ms);
                self.speed_index = index;
                true
            }
            Err(e) => {
                log::debug!("{}", e);
                false
            }
        }
    }

    /// Select the table entry with exactly this interval; other values are ignored
    pub fn set_interval(&mut self, interval: Duration) -> bool {
        match self.speeds.position(interval) {
            Some(index) => self.set_speed(index),
            None => false,
        }
    }

    /// One step faster; no-op at the fastest entry
    pub fn faster(&mut self) -> bool {
        self.set_speed(self.speed_index + 1)
    }

    /// One step slower; no-op at the slowest entry
    pub fn slower(&mut self) -> bool {
        match self.speed_index.checked_sub(1) {
            Some(index) => self.set_speed(index),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_of_life::{presets, RuleSet};
    use crate::scheduler::ManualFrameSource;

    fn scheduler() -> AnimationScheduler<ManualFrameSource> {
        // Index 1 is the 200 ms step
        AnimationScheduler::new(ManualFrameSource::new(), SpeedTable::default(), 1).unwrap()
    }

    fn blinker_engine() -> GenerationEngine {
        let mut engine = GenerationEngine::new(5, 5, RuleSet::conway()).unwrap();
        engine.place_pattern(&presets::blinker(), 2, 1).unwrap();
        engine
    }

    /// Move the clock forward and deliver the outstanding frame
    fn frame_after(
        scheduler: &mut AnimationScheduler<ManualFrameSource>,
        engine: &mut GenerationEngine,
        millis: u64,
    ) -> usize {
        scheduler.frames_mut().advance_ms(millis);
        let frame = scheduler.frames_mut().next_frame().expect("frame should be pending");
        scheduler.on_frame(frame, engine, |_, _| {})
    }

    #[test]
    fn test_created_stopped() {
        let scheduler = scheduler();
        assert_eq!(scheduler.state(), SchedulerState::Stopped);
        assert_eq!(scheduler.interval(), Duration::from_millis(200));
        assert!(scheduler.frames().pending().is_none());
    }

    #[test]
    fn test_invalid_initial_speed() {
        let result = AnimationScheduler::new(ManualFrameSource::new(), SpeedTable::default(), 5);
        assert!(matches!(result, Err(SimError::InvalidSpeedIndex { index: 5, len: 5 })));
    }

    #[test]
    fn test_start_and_stop_are_idempotent() {
        let mut scheduler = scheduler();

        assert!(scheduler.start());
        assert!(!scheduler.start());
        assert_eq!(scheduler.frames().requested(), 1);

        assert!(scheduler.stop());
        assert!(!scheduler.stop());
        assert_eq!(scheduler.frames().cancelled(), 1);
        assert!(scheduler.frames().pending().is_none());
    }

    #[test]
    fn test_accumulator_banks_partial_intervals() {
        let mut scheduler = scheduler();
        let mut engine = blinker_engine();
        scheduler.start();

        assert_eq!(frame_after(&mut scheduler, &mut engine, 90), 0);
        assert_eq!(frame_after(&mut scheduler, &mut engine, 90), 0);
        assert_eq!(frame_after(&mut scheduler, &mut engine, 90), 1);
        assert_eq!(scheduler.accumulated(), Duration::from_millis(70));

        assert_eq!(frame_after(&mut scheduler, &mut engine, 150), 1);
        assert_eq!(scheduler.accumulated(), Duration::from_millis(20));
        assert_eq!(engine.generation(), 2);
    }

    #[test]
    fn test_long_frame_catches_up() {
        let mut scheduler = scheduler();
        let mut engine = blinker_engine();
        scheduler.start();

        let mut seen = Vec::new();
        scheduler.frames_mut().advance_ms(650);
        let frame = scheduler.frames_mut().next_frame().unwrap();
        let steps = scheduler.on_frame(frame, &mut engine, |_, result| {
            seen.push(result.generation)
        });

        assert_eq!(steps, 3);
        assert_eq!(seen, vec![1, 2, 3]);
        assert_eq!(scheduler.accumulated(), Duration::from_millis(50));
    }

    #[test]
    fn test_step_limit_keeps_banked_time() {
        let mut scheduler = scheduler();
        let mut engine = blinker_engine();
        scheduler.start();

        scheduler.frames_mut().advance_ms(650);
        let frame = scheduler.frames_mut().next_frame().unwrap();
        let steps = scheduler.on_frame_limited(frame, &mut engine, 2, |_, _| {});

        assert_eq!(steps, 2);
        assert_eq!(engine.generation(), 2);
        assert_eq!(scheduler.accumulated(), Duration::from_millis(250));
        assert!(scheduler.is_running());
        assert!(scheduler.frames().pending().is_some());
    }

    #[test]
    fn test_catch_up_is_capped() {
        let mut scheduler = scheduler().with_max_catch_up_steps(4);
        let mut engine = blinker_engine();
        scheduler.start();

        // Ten seconds in the background is fifty intervals
        assert_eq!(frame_after(&mut scheduler, &mut engine, 10_030), 4);
        assert_eq!(scheduler.accumulated(), Duration::from_millis(30));
        assert!(scheduler.frames().pending().is_some());

        assert_eq!(frame_after(&mut scheduler, &mut engine, 100), 0);
    }

    #[test]
    fn test_no_advance_after_stop() {
        let mut scheduler = scheduler();
        let mut engine = blinker_engine();
        scheduler.start();

        scheduler.frames_mut().advance_ms(500);
        let frame = Frame {
            handle: scheduler.frames().pending().unwrap(),
            timestamp: scheduler.frames().now(),
        };
        scheduler.stop();

        assert_eq!(scheduler.on_frame(frame, &mut engine, |_, _| {}), 0);
        assert_eq!(engine.generation(), 0);
        assert!(scheduler.frames_mut().next_frame().is_none());
    }

    #[test]
    fn test_restart_resets_accumulator() {
        let mut scheduler = scheduler();
        let mut engine = blinker_engine();
        scheduler.start();
        frame_after(&mut scheduler, &mut engine, 150);
        scheduler.stop();
        assert_eq!(scheduler.accumulated(), Duration::from_millis(150));

        // Time spent stopped is not banked
        scheduler.frames_mut().advance_ms(1_000);
        scheduler.start();
        assert_eq!(scheduler.accumulated(), Duration::ZERO);
        assert_eq!(frame_after(&mut scheduler, &mut engine, 100), 0);
    }

    #[test]
    fn test_step_stops_and_advances_once() {
        let mut scheduler = scheduler();
        let mut engine = blinker_engine();
        scheduler.start();

        let result = scheduler.step(&mut engine);
        assert_eq!(result.generation, 1);
        assert_eq!(scheduler.state(), SchedulerState::Stopped);

        // Works while stopped too
        assert_eq!(scheduler.step(&mut engine).generation, 2);
    }

    #[test]
    fn test_speed_changes_clamp_at_edges() {
        let mut scheduler = scheduler();

        assert!(scheduler.slower());
        assert_eq!(scheduler.interval(), Duration::from_millis(500));
        assert!(!scheduler.slower());
        assert_eq!(scheduler.speed_index(), 0);

        assert!(scheduler.set_speed(4));
        assert!(!scheduler.faster());
        assert!(!scheduler.set_speed(5));
        assert_eq!(scheduler.interval(), Duration::from_millis(5));

        assert!(scheduler.set_interval(Duration::from_millis(50)));
        assert!(!scheduler.set_interval(Duration::from_millis(60)));
        assert_eq!(scheduler.speed().label, "Fast");
    }

    #[test]
    fn test_speed_change_keeps_state_and_applies_next_frame() {
        let mut scheduler = scheduler();
        let mut engine = blinker_engine();
        scheduler.start();

        assert_eq!(frame_after(&mut scheduler, &mut engine, 60), 0);
        scheduler.set_speed(2);
        assert!(scheduler.is_running());
        assert_eq!(frame_after(&mut scheduler, &mut engine, 60), 2);
        assert_eq!(scheduler.accumulated(), Duration::from_millis(20));
    }
}
