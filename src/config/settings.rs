//! Configuration settings for the simulator

use crate::error::SimError;
use crate::game_of_life::{RulePreset, RuleSet};
use crate::scheduler::{SpeedStep, SpeedTable, DEFAULT_MAX_CATCH_UP_STEPS};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub board: BoardConfig,
    pub rules: RuleSet,
    pub speed: SpeedConfig,
    pub scheduler: SchedulerConfig,
    pub run: RunConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub width: usize,
    pub height: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeedConfig {
    /// Ordered from slowest to fastest
    pub steps: Vec<SpeedStep>,
    pub initial_index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    pub max_catch_up_steps: usize,
    pub frame_rate_hz: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Stop after this many generations; 0 runs until interrupted
    pub max_generations: u64,
    pub autostart: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputConfig {
    pub pattern_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub show_status: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Text,
    Json,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            board: BoardConfig {
                width: 50,
                height: 25,
            },
            rules: RuleSet::conway(),
            speed: SpeedConfig {
                steps: SpeedTable::default_steps(),
                initial_index: 1,
            },
            scheduler: SchedulerConfig {
                max_catch_up_steps: DEFAULT_MAX_CATCH_UP_STEPS,
                frame_rate_hz: 60,
            },
            run: RunConfig {
                max_generations: 100,
                autostart: true,
            },
            input: InputConfig { pattern_file: None },
            output: OutputConfig {
                format: OutputFormat::Text,
                show_status: true,
            },
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file(&self, path: &PathBuf) -> Result<()> {
        let content = serde_yaml::to_string(self).context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.board.width == 0 || self.board.height == 0 {
            return Err(SimError::InvalidDimensions {
                width: self.board.width,
                height: self.board.height,
            })
            .context("Invalid board size");
        }

        self.rules.validate().context("Invalid rules")?;

        self.speed_table()?
            .check_index(self.speed.initial_index)
            .context("Invalid initial speed")?;

        if self.scheduler.max_catch_up_steps == 0 {
            anyhow::bail!("Maximum catch-up steps must be positive");
        }

        if self.scheduler.frame_rate_hz == 0 {
            anyhow::bail!("Frame rate must be positive");
        }

        if let Some(ref pattern_file) = self.input.pattern_file {
            if !pattern_file.exists() {
                anyhow::bail!("Pattern file does not exist: {}", pattern_file.display());
            }
        }

        Ok(())
    }

    /// Build the validated speed table
    pub fn speed_table(&self) -> Result<SpeedTable> {
        SpeedTable::new(self.speed.steps.clone()).context("Invalid speed table")
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(width) = cli_overrides.width {
            self.board.width = width;
        }
        if let Some(height) = cli_overrides.height {
            self.board.height = height;
        }
        if let Some(preset) = cli_overrides.rule {
            self.rules = preset.rules();
        }
        if let Some(speed_index) = cli_overrides.speed_index {
            self.speed.initial_index = speed_index;
        }
        if let Some(ref pattern_file) = cli_overrides.pattern_file {
            self.input.pattern_file = Some(pattern_file.clone());
        }
        if let Some(max_generations) = cli_overrides.max_generations {
            self.run.max_generations = max_generations;
        }
        if let Some(format) = cli_overrides.format {
            self.output.format = format;
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub width: Option<usize>,
    pub height: Option<usize>,
    pub rule: Option<RulePreset>,
    pub speed_index: Option<usize>,
    pub pattern_file: Option<PathBuf>,
    pub max_generations: Option<u64>,
    pub format: Option<OutputFormat>,
}
