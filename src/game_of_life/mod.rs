//! Game of Life core functionality

pub mod engine;
pub mod grid;
pub mod io;
pub mod patterns;
pub mod rules;

pub use engine::{AdvanceResult, GenerationEngine};
pub use grid::{Cell, CellId, Grid};
pub use io::{
    create_example_patterns, load_pattern_from_file, load_patterns_from_directory,
    save_grid_to_file,
};
pub use patterns::{presets, Pattern};
pub use rules::{RulePreset, RuleSet};
