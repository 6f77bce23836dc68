//! Seed patterns that can be stamped onto a grid

use super::grid::{CellId, Grid};
use crate::error::SimError;
use serde::{Deserialize, Serialize};

/// A named set of live cells, relative to the pattern's top-left corner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    pub name: String,
    pub width: usize,
    pub height: usize,
    /// `(row, col)` offsets of alive cells
    pub cells: Vec<(usize, usize)>,
}

impl Pattern {
    /// Create a pattern from alive cell offsets; the bounding box is derived
    pub fn new(name: impl Into<String>, cells: Vec<(usize, usize)>) -> Self {
        let height = cells.iter().map(|(r, _)| r + 1).max().unwrap_or(0);
        let width = cells.iter().map(|(_, c)| c + 1).max().unwrap_or(0);
        Self {
            name: name.into(),
            width,
            height,
            cells,
        }
    }

    /// Create a pattern from rows of alive flags, keeping the full row extent
    pub fn from_rows(name: impl Into<String>, rows: &[Vec<bool>]) -> Self {
        let cells = rows
            .iter()
            .enumerate()
            .flat_map(|(r, row)| {
                row.iter()
                    .enumerate()
                    .filter(|(_, &alive)| alive)
                    .map(move |(c, _)| (r, c))
            })
            .collect();

        Self {
            name: name.into(),
            width: rows.first().map_or(0, Vec::len),
            height: rows.len(),
            cells,
        }
    }

    /// Ids this pattern covers when its top-left corner sits at `(row, col)`
    pub fn cell_ids(&self, grid: &Grid, row: usize, col: usize) -> Result<Vec<CellId>, SimError> {
        let (width, height) = grid.dimensions();
        if row + self.height > height || col + self.width > width {
            return Err(SimError::PatternOutOfBounds {
                pattern_width: self.width,
                pattern_height: self.height,
                row,
                col,
                width,
                height,
            });
        }

        Ok(self
            .cells
            .iter()
            .map(|&(dr, dc)| grid.index(row + dr, col + dc))
            .collect())
    }

    /// Top-left position that centers this pattern on the grid
    pub fn centered_origin(&self, grid: &Grid) -> (usize, usize) {
        let (width, height) = grid.dimensions();
        (
            height.saturating_sub(self.height) / 2,
            width.saturating_sub(self.width) / 2,
        )
    }

    pub fn population(&self) -> usize {
        self.cells.len()
    }
}

/// Classic Game of Life patterns
pub mod presets {
    use super::Pattern;

    /// Glider, travels diagonally with period 4
    pub fn glider() -> Pattern {
        Pattern::new("glider", vec![(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)])
    }

    /// Blinker, horizontal phase
    pub fn blinker() -> Pattern {
        Pattern::new("blinker", vec![(0, 0), (0, 1), (0, 2)])
    }

    /// Block still life
    pub fn block() -> Pattern {
        Pattern::new("block", vec![(0, 0), (0, 1), (1, 0), (1, 1)])
    }

    /// Beacon, period 2
    pub fn beacon() -> Pattern {
        Pattern::new(
            "beacon",
            vec![(0, 0), (0, 1), (1, 0), (2, 3), (3, 2), (3, 3)],
        )
    }

    /// Toad, period 2
    pub fn toad() -> Pattern {
        Pattern::new(
            "toad",
            vec![(0, 1), (0, 2), (0, 3), (1, 0), (1, 1), (1, 2)],
        )
    }

    pub fn all_patterns() -> Vec<Pattern> {
        vec![glider(), blinker(), block(), beacon(), toad()]
    }

    pub fn by_name(name: &str) -> Option<Pattern> {
        all_patterns().into_iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }
}
