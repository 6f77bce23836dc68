//! Display and output formatting utilities

use crate::game_of_life::{GenerationEngine, Grid};
use anyhow::Result;
use serde::Serialize;

/// Serializable view of a board at one generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridSnapshot {
    pub generation: u64,
    pub rules: String,
    pub width: usize,
    pub height: usize,
    pub population: usize,
    pub rows: Vec<String>,
}

impl GridSnapshot {
    pub fn capture(engine: &GenerationEngine) -> Self {
        let grid = engine.grid();
        Self {
            generation: engine.generation(),
            rules: engine.rules().notation(),
            width: grid.width(),
            height: grid.height(),
            population: grid.living_count(),
            rows: GridFormatter::format_grid_compact(grid)
                .lines()
                .map(str::to_string)
                .collect(),
        }
    }
}

/// Format grids for display
pub struct GridFormatter;

impl GridFormatter {
    /// Format a grid in compact form
    pub fn format_grid_compact(grid: &Grid) -> String {
        grid.to_string()
    }

    /// Format a grid with coordinates
    pub fn format_grid_with_coords(grid: &Grid) -> String {
        let mut output = String::new();

        // Header with column numbers
        output.push_str("   ");
        for col in 0..grid.width() {
            output.push_str(&format!("{:2}", col % 10));
        }
        output.push('\n');

        // Rows with row numbers
        for row in 0..grid.height() {
            output.push_str(&format!("{:2} ", row));
            for col in 0..grid.width() {
                output.push_str(if grid.get(row, col) { "██" } else { "··" });
            }
            output.push('\n');
        }

        output
    }

    /// One-line summary of the engine state
    pub fn format_status(engine: &GenerationEngine) -> String {
        format!(
            "Generation {} | Population {} | {}",
            engine.generation(),
            engine.population(),
            engine.rules().notation()
        )
    }

    /// Pretty JSON for the current engine state
    pub fn format_json(engine: &GenerationEngine) -> Result<String> {
        Ok(serde_json::to_string_pretty(&GridSnapshot::capture(engine))?)
    }
}

/// Color output utilities
pub struct ColorOutput;

impl ColorOutput {
    /// Format text with color (if terminal supports it)
    pub fn colored(text: &str, color: Color) -> String {
        if Self::supports_color() {
            format!("\x1b[{}m{}\x1b[0m", color.code(), text)
        } else {
            text.to_string()
        }
    }

    /// Check if terminal supports color
    fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err() && (std::env::var("TERM").unwrap_or_default() != "dumb")
    }

    /// Format success message
    pub fn success(text: &str) -> String {
        Self::colored(text, Color::Green)
    }

    /// Format error message
    pub fn error(text: &str) -> String {
        Self::colored(text, Color::Red)
    }

    /// Format warning message
    pub fn warning(text: &str) -> String {
        Self::colored(text, Color::Yellow)
    }

    /// Format info message
    pub fn info(text: &str) -> String {
        Self::colored(text, Color::Blue)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
}

impl Color {
    fn code(self) -> u8 {
        match self {
            Color::Red => 31,
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
        }
    }
}
