//! Game of Life simulator
//!
//! A headless core for Conway's Game of Life: a bounded grid advanced one
//! generation at a time, a frame-driven scheduler that paces generations
//! independently of the refresh rate, and a command channel for input.

pub mod config;
pub mod error;
pub mod game_of_life;
pub mod render;
pub mod scheduler;
pub mod simulation;
pub mod utils;

pub use config::Settings;
pub use error::SimError;
pub use game_of_life::{AdvanceResult, GenerationEngine, Grid, RuleSet};
pub use scheduler::{AnimationScheduler, FrameSource};
pub use simulation::{Command, Simulation};
