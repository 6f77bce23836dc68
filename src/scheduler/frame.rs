//! Frame sources: the host's refresh-driven clock

use std::time::{Duration, Instant};

/// Token for one requested frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

/// A delivered frame and the time it fired at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub handle: FrameHandle,
    pub timestamp: Duration,
}

/// Refresh-driven scheduling primitive.
///
/// At most one frame is outstanding at a time. `next_frame` yields the
/// outstanding frame once it is due and `None` when nothing was requested.
pub trait FrameSource {
    fn request_frame(&mut self) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
    /// Monotonic time since the source was created
    fn now(&self) -> Duration;
    fn next_frame(&mut self) -> Option<Frame>;
}

/// Frame source whose clock only moves when told to
#[derive(Debug, Default)]
pub struct ManualFrameSource {
    now: Duration,
    next_id: u64,
    pending: Option<FrameHandle>,
    frame_step: Duration,
    requested: usize,
    cancelled: usize,
}

impl ManualFrameSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward by `step` each time a frame is delivered
    pub fn with_frame_step(step: Duration) -> Self {
        Self {
            frame_step: step,
            ..Self::default()
        }
    }

    pub fn advance(&mut self, delta: Duration) {
        self.now += delta;
    }

    pub fn advance_ms(&mut self, millis: u64) {
        self.advance(Duration::from_millis(millis));
    }

    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Total frames requested so far
    pub fn requested(&self) -> usize {
        self.requested
    }

    /// Total frames cancelled so far
    pub fn cancelled(&self) -> usize {
        self.cancelled
    }
}

impl FrameSource for ManualFrameSource {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending = Some(handle);
        self.requested += 1;
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
            self.cancelled += 1;
        }
    }

    fn now(&self) -> Duration {
        self.now
    }

    fn next_frame(&mut self) -> Option<Frame> {
        let handle = self.pending.take()?;
        self.now += self.frame_step;
        Some(Frame {
            handle,
            timestamp: self.now,
        })
    }
}

/// Wall-clock frame source firing at a fixed refresh rate
#[derive(Debug)]
pub struct IntervalFrameSource {
    origin: Instant,
    period: Duration,
    next_id: u64,
    pending: Option<FrameHandle>,
    last_frame: Option<Duration>,
}

impl IntervalFrameSource {
    pub fn new(frame_rate_hz: u32) -> Self {
        Self {
            origin: Instant::now(),
            period: Duration::from_secs(1) / frame_rate_hz.max(1),
            next_id: 0,
            pending: None,
            last_frame: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

impl FrameSource for IntervalFrameSource {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending = Some(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }

    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    /// Blocks until the next refresh boundary, then delivers the pending frame
    fn next_frame(&mut self) -> Option<Frame> {
        let handle = self.pending.take()?;

        if let Some(last) = self.last_frame {
            let due = last + self.period;
            let now = self.now();
            if due > now {
                std::thread::sleep(due - now);
            }
        }

        let timestamp = self.now();
        self.last_frame = Some(timestamp);
        Some(Frame { handle, timestamp })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_source_delivers_pending_once() {
        let mut source = ManualFrameSource::new();
        assert!(source.next_frame().is_none());

        let handle = source.request_frame();
        source.advance_ms(16);
        let frame = source.next_frame().unwrap();
        assert_eq!(frame.handle, handle);
        assert_eq!(frame.timestamp, Duration::from_millis(16));
        assert!(source.next_frame().is_none());
    }

    #[test]
    fn test_manual_source_frame_step() {
        let mut source = ManualFrameSource::with_frame_step(Duration::from_millis(10));
        source.request_frame();
        assert_eq!(source.next_frame().unwrap().timestamp, Duration::from_millis(10));
        assert_eq!(source.now(), Duration::from_millis(10));

        // No frame, no tick
        assert!(source.next_frame().is_none());
        assert_eq!(source.now(), Duration::from_millis(10));
    }

    #[test]
    fn test_manual_source_cancel() {
        let mut source = ManualFrameSource::new();
        let stale = source.request_frame();
        let current = source.request_frame();

        source.cancel_frame(stale);
        assert_eq!(source.pending(), Some(current));
        assert_eq!(source.cancelled(), 0);

        source.cancel_frame(current);
        assert!(source.next_frame().is_none());
        assert_eq!(source.cancelled(), 1);
        assert_eq!(source.requested(), 2);
    }

    #[test]
    fn test_interval_source_paces_frames() {
        let mut source = IntervalFrameSource::new(200);
        assert_eq!(source.period(), Duration::from_millis(5));

        source.request_frame();
        let first = source.next_frame().unwrap();
        source.request_frame();
        let second = source.next_frame().unwrap();

        assert!(second.timestamp >= first.timestamp + source.period());
        assert_ne!(first.handle, second.handle);
    }

    #[test]
    fn test_interval_source_without_request() {
        let mut source = IntervalFrameSource::new(60);
        assert!(source.next_frame().is_none());
    }
}
