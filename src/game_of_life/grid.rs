//! Grid representation and utilities for Game of Life

use crate::error::SimError;
use itertools::iproduct;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Row-major cell index: `row * width + col`
pub type CellId = usize;

/// A single cell and the state it held before its last change
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub alive: bool,
    pub last_alive: bool,
}

impl Cell {
    /// Whether the most recent mutation flipped this cell
    pub fn changed(&self) -> bool {
        self.alive != self.last_alive
    }
}

/// Fixed-size board of cells. Positions outside the board are always dead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a new grid with every cell dead
    pub fn new(width: usize, height: usize) -> Result<Self, SimError> {
        if width == 0 || height == 0 {
            return Err(SimError::InvalidDimensions { width, height });
        }

        Ok(Self {
            width,
            height,
            cells: vec![Cell::default(); width * height],
        })
    }

    /// Create a grid from a 2D boolean array
    pub fn from_rows(rows: Vec<Vec<bool>>) -> Result<Self, SimError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        let mut grid = Self::new(width, height)?;

        for (row_idx, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(SimError::InvalidDimensions { width: row.len(), height });
            }
            for (col_idx, alive) in row.into_iter().enumerate() {
                let id = grid.index(row_idx, col_idx);
                grid.cells[id].alive = alive;
            }
        }

        Ok(grid)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Convert 2D coordinates to a cell id
    #[inline]
    pub fn index(&self, row: usize, col: usize) -> CellId {
        row * self.width + col
    }

    /// Convert a cell id back to `(row, col)`
    #[inline]
    pub fn position(&self, id: CellId) -> (usize, usize) {
        (id / self.width, id % self.width)
    }

    pub fn contains(&self, id: CellId) -> bool {
        id < self.cells.len()
    }

    pub fn check_id(&self, id: CellId) -> Result<(), SimError> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(SimError::InvalidCellId { id, cell_count: self.cells.len() })
        }
    }

    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(id)
    }

    pub(crate) fn cell_mut(&mut self, id: CellId) -> Option<&mut Cell> {
        self.cells.get_mut(id)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Whether the cell is alive; unknown ids read as dead
    pub fn alive(&self, id: CellId) -> bool {
        self.cells.get(id).is_some_and(|cell| cell.alive)
    }

    /// Get cell state at coordinates
    pub fn get(&self, row: usize, col: usize) -> bool {
        if row < self.height && col < self.width {
            self.cells[self.index(row, col)].alive
        } else {
            false // Out of bounds cells are considered dead
        }
    }

    /// Ids of the in-bounds cells around `id`, excluding `id` itself
    pub fn neighbor_ids(&self, id: CellId) -> impl Iterator<Item = CellId> + '_ {
        let (row, col) = self.position(id);

        iproduct!(-1isize..=1, -1isize..=1)
            .filter(|&(dr, dc)| dr != 0 || dc != 0)
            .filter_map(move |(dr, dc)| {
                let r = row.checked_add_signed(dr)?;
                let c = col.checked_add_signed(dc)?;
                (r < self.height && c < self.width).then(|| self.index(r, c))
            })
    }

    /// Count living neighbors of `id` against an external alive snapshot
    pub(crate) fn count_neighbors_in(&self, snapshot: &[bool], id: CellId) -> u8 {
        self.neighbor_ids(id).filter(|&n| snapshot[n]).count() as u8
    }

    /// Count living neighbors of `id` in the current state
    pub fn count_neighbors(&self, id: CellId) -> u8 {
        self.neighbor_ids(id).filter(|&n| self.cells[n].alive).count() as u8
    }

    /// Current alive flags, indexed by cell id
    pub fn snapshot(&self) -> Vec<bool> {
        self.cells.iter().map(|cell| cell.alive).collect()
    }

    /// Get all living cell ids in ascending order
    pub fn living_ids(&self) -> Vec<CellId> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.alive)
            .map(|(id, _)| id)
            .collect()
    }

    /// Count total living cells
    pub fn living_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.alive).count()
    }

    /// Check if the grid is empty (no living cells)
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|cell| !cell.alive)
    }

    /// Alive flags as rows, top to bottom
    pub fn to_rows(&self) -> Vec<Vec<bool>> {
        self.cells
            .chunks(self.width)
            .map(|row| row.iter().map(|cell| cell.alive).collect())
            .collect()
    }
}

/// One line per row, `█` for alive and `·` for dead
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.width) {
            for cell in row {
                write!(f, "{}", if cell.alive { '█' } else { '·' })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
