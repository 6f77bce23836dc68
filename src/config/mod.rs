//! Configuration management for the simulator

pub mod settings;

pub use settings::{
    BoardConfig, CliOverrides, InputConfig, OutputConfig, OutputFormat, RunConfig, SchedulerConfig,
    Settings, SpeedConfig,
};
