//! Simulation context: engine, scheduler, renderer and input channel

pub mod command;

pub use command::{Command, CommandSender, ParseCommandError};

use crate::config::Settings;
use crate::game_of_life::{load_pattern_from_file, CellId, GenerationEngine};
use crate::render::Renderer;
use crate::scheduler::{AnimationScheduler, FrameSource};
use anyhow::{Context, Result};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::time::Duration;

/// Owns everything one board needs and applies commands to it
pub struct Simulation<F: FrameSource, R: Renderer> {
    engine: GenerationEngine,
    scheduler: AnimationScheduler<F>,
    renderer: R,
    sender: CommandSender,
    commands: Receiver<Command>,
    quit: bool,
}

impl<F: FrameSource, R: Renderer> Simulation<F, R> {
    /// Build a simulation from settings and draw the initial board
    pub fn new(settings: &Settings, frames: F, renderer: R) -> Result<Self> {
        settings.validate()?;

        let mut engine = GenerationEngine::new(
            settings.board.width,
            settings.board.height,
            settings.rules.clone(),
        )?;

        if let Some(ref pattern_file) = settings.input.pattern_file {
            let pattern = load_pattern_from_file(pattern_file)?;
            engine
                .place_pattern_centered(&pattern)
                .with_context(|| format!("Failed to place pattern '{}'", pattern.name))?;
            log::info!("loaded pattern '{}' ({} cells)", pattern.name, pattern.population());
        }

        let speeds = settings.speed_table()?;
        let scheduler = AnimationScheduler::new(frames, speeds, settings.speed.initial_index)?
            .with_max_catch_up_steps(settings.scheduler.max_catch_up_steps);

        Ok(Self::from_parts(engine, scheduler, renderer))
    }

    /// Assemble a simulation from prepared parts and draw the initial board
    pub fn from_parts(
        engine: GenerationEngine,
        scheduler: AnimationScheduler<F>,
        renderer: R,
    ) -> Self {
        let (sender, commands) = mpsc::channel();
        let mut simulation = Self {
            engine,
            scheduler,
            renderer,
            sender,
            commands,
            quit: false,
        };
        simulation.renderer.render(simulation.engine.grid(), None);
        simulation
    }

    pub fn engine(&self) -> &GenerationEngine {
        &self.engine
    }

    pub fn scheduler(&self) -> &AnimationScheduler<F> {
        &self.scheduler
    }

    pub fn frames_mut(&mut self) -> &mut F {
        self.scheduler.frames_mut()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Sender for the input channel; may be moved to another thread
    pub fn sender(&self) -> CommandSender {
        self.sender.clone()
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Apply a command immediately
    pub fn dispatch(&mut self, command: Command) {
        log::debug!("dispatching {:?}", command);

        match command {
            Command::SetCells { ids, alive } => {
                let changed = self.engine.set_cells(ids, alive);
                self.render_changed(changed);
            }
            Command::ToggleCell { id } => {
                if self.engine.toggle_cell(id).is_some() {
                    self.render_changed(vec![id]);
                } else {
                    log::warn!("ignoring toggle of out-of-range cell id {}", id);
                }
            }
            Command::ToggleRun => {
                self.scheduler.toggle();
            }
            Command::Start => {
                self.scheduler.start();
            }
            Command::Stop => {
                self.scheduler.stop();
            }
            Command::Step => {
                let result = self.scheduler.step(&mut self.engine);
                self.render_changed(result.changed_ids());
            }
            Command::Clear => {
                self.scheduler.stop();
                let changed = self.engine.clear();
                self.render_changed(changed);
            }
            Command::Faster => {
                self.scheduler.faster();
            }
            Command::Slower => {
                self.scheduler.slower();
            }
            Command::SetSpeed { index } => {
                self.scheduler.set_speed(index);
            }
            Command::Quit => {
                self.scheduler.stop();
                self.quit = true;
            }
        }
    }

    /// Dispatch every queued command without blocking; returns how many ran
    pub fn pump_commands(&mut self) -> usize {
        let mut handled = 0;
        loop {
            match self.commands.try_recv() {
                Ok(command) => {
                    self.dispatch(command);
                    handled += 1;
                }
                // The simulation holds a sender, so the channel never disconnects
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return handled,
            }
        }
    }

    /// Block up to `timeout` for one command; returns whether one arrived
    pub fn wait_for_command(&mut self, timeout: Duration) -> bool {
        match self.commands.recv_timeout(timeout) {
            Ok(command) => {
                self.dispatch(command);
                true
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => false,
        }
    }

    /// Deliver the next frame, if one is pending, rendering after each generation.
    /// Returns the number of generations run, or `None` when no frame was pending.
    pub fn poll_frame(&mut self) -> Option<usize> {
        self.poll_frame_limited(usize::MAX)
    }

    fn poll_frame_limited(&mut self, max_steps: usize) -> Option<usize> {
        let frame = self.scheduler.frames_mut().next_frame()?;
        let renderer = &mut self.renderer;
        let steps = self.scheduler.on_frame_limited(
            frame,
            &mut self.engine,
            max_steps,
            |grid, result| renderer.render(grid, Some(&result.changed_ids())),
        );
        Some(steps)
    }

    /// Drive the loop until `max_generations` is reached (0 for no limit), a
    /// quit command arrives, or, unless `wait_for_input` is set, the scheduler
    /// stops. Returns the generation reached.
    pub fn run(&mut self, max_generations: u64, wait_for_input: bool) -> u64 {
        const INPUT_POLL: Duration = Duration::from_millis(50);

        loop {
            self.pump_commands();
            if self.quit {
                break;
            }

            let budget = if max_generations == 0 {
                usize::MAX
            } else {
                let remaining = max_generations.saturating_sub(self.engine.generation());
                if remaining == 0 {
                    self.scheduler.stop();
                    log::info!("reached generation limit {}", max_generations);
                    break;
                }
                usize::try_from(remaining).unwrap_or(usize::MAX)
            };

            if self.poll_frame_limited(budget).is_none() {
                if !wait_for_input {
                    break;
                }
                self.wait_for_command(INPUT_POLL);
            }
        }

        self.engine.generation()
    }

    fn render_changed(&mut self, mut changed: Vec<CellId>) {
        changed.sort_unstable();
        self.renderer.render(self.engine.grid(), Some(&changed));
    }
}
