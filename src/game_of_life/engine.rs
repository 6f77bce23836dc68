//! Generation engine: owns the grid and applies the rule set

use super::grid::{CellId, Grid};
use super::patterns::Pattern;
use super::rules::RuleSet;
use crate::error::SimError;
use itertools::Itertools;
use rayon::prelude::*;
use serde::Serialize;

/// Cells that flipped during one generation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AdvanceResult {
    /// Generation number after the advance
    pub generation: u64,
    /// Ids that became alive, ascending
    pub born: Vec<CellId>,
    /// Ids that died, ascending
    pub died: Vec<CellId>,
}

impl AdvanceResult {
    /// All changed ids in ascending order
    pub fn changed_ids(&self) -> Vec<CellId> {
        self.born.iter().merge(self.died.iter()).copied().collect()
    }

    pub fn change_count(&self) -> usize {
        self.born.len() + self.died.len()
    }

    pub fn is_unchanged(&self) -> bool {
        self.born.is_empty() && self.died.is_empty()
    }
}

/// Owns the cell grid and computes generation transitions
#[derive(Debug, Clone)]
pub struct GenerationEngine {
    grid: Grid,
    rules: RuleSet,
    generation: u64,
}

impl GenerationEngine {
    /// Allocate a `width x height` grid of dead cells
    pub fn new(width: usize, height: usize, rules: RuleSet) -> Result<Self, SimError> {
        rules.validate()?;
        let grid = Grid::new(width, height)?;
        log::debug!(
            "created {}x{} engine with rules {}",
            width,
            height,
            rules.notation()
        );

        Ok(Self {
            grid,
            rules,
            generation: 0,
        })
    }

    /// Wrap an existing grid (useful for testing)
    pub fn with_grid(grid: Grid, rules: RuleSet) -> Result<Self, SimError> {
        rules.validate()?;
        Ok(Self {
            grid,
            rules,
            generation: 0,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn population(&self) -> usize {
        self.grid.living_count()
    }

    /// Set every listed cell to `alive`.
    ///
    /// Cells already in the target state keep their `last_alive`. Unknown ids
    /// are skipped. Returns the ids that actually changed, in input order.
    pub fn set_cells<I>(&mut self, ids: I, alive: bool) -> Vec<CellId>
    where
        I: IntoIterator<Item = CellId>,
    {
        let mut changed = Vec::new();
        let cell_count = self.grid.cell_count();

        for id in ids {
            let Some(cell) = self.grid.cell_mut(id) else {
                log::warn!(
                    "ignoring out-of-range cell id {} (grid has {} cells)",
                    id,
                    cell_count
                );
                continue;
            };
            if cell.alive == alive {
                continue;
            }
            cell.last_alive = cell.alive;
            cell.alive = alive;
            changed.push(id);
        }

        changed
    }

    /// Flip a single cell; returns its new state, or `None` for an unknown id
    pub fn toggle_cell(&mut self, id: CellId) -> Option<bool> {
        let target = !self.grid.cell(id)?.alive;
        self.set_cells([id], target);
        Some(target)
    }

    /// Live cells among the up-to-8 in-bounds neighbors of `id`
    pub fn count_live_neighbors(&self, id: CellId) -> Result<u8, SimError> {
        self.grid.check_id(id)?;
        Ok(self.grid.count_neighbors(id))
    }

    /// Advance one generation.
    ///
    /// Every cell is classified against the pre-advance snapshot before any
    /// cell is written, and every cell's `last_alive` ends up holding its
    /// pre-advance state.
    pub fn advance(&mut self) -> AdvanceResult {
        let snapshot = self.grid.snapshot();
        let grid = &self.grid;
        let rules = &self.rules;

        let next: Vec<bool> = (0..snapshot.len())
            .into_par_iter()
            .map(|id| rules.next_state(snapshot[id], grid.count_neighbors_in(&snapshot, id)))
            .collect();

        let mut born = Vec::new();
        let mut died = Vec::new();
        for (id, (cell, &alive)) in self.grid.cells_mut().iter_mut().zip(&next).enumerate() {
            cell.last_alive = cell.alive;
            cell.alive = alive;
            match (cell.last_alive, alive) {
                (false, true) => born.push(id),
                (true, false) => died.push(id),
                _ => {}
            }
        }

        self.generation += 1;
        log::trace!(
            "generation {}: {} born, {} died",
            self.generation,
            born.len(),
            died.len()
        );

        AdvanceResult {
            generation: self.generation,
            born,
            died,
        }
    }

    /// Advance `generations` times, returning the last result
    pub fn advance_by(&mut self, generations: usize) -> Option<AdvanceResult> {
        (0..generations).map(|_| self.advance()).last()
    }

    /// Kill every live cell and reset the generation counter
    pub fn clear(&mut self) -> Vec<CellId> {
        let living = self.grid.living_ids();
        self.generation = 0;
        self.set_cells(living, false)
    }

    /// Bring a pattern to life with its top-left corner at `(row, col)`
    pub fn place_pattern(
        &mut self,
        pattern: &Pattern,
        row: usize,
        col: usize,
    ) -> Result<Vec<CellId>, SimError> {
        let ids = pattern.cell_ids(&self.grid, row, col)?;
        Ok(self.set_cells(ids, true))
    }

    /// Bring a pattern to life centered on the grid
    pub fn place_pattern_centered(&mut self, pattern: &Pattern) -> Result<Vec<CellId>, SimError> {
        let (row, col) = pattern.centered_origin(&self.grid);
        self.place_pattern(pattern, row, col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_of_life::patterns::presets;

    fn engine(width: usize, height: usize) -> GenerationEngine {
        GenerationEngine::new(width, height, RuleSet::conway()).unwrap()
    }

    fn ids(engine: &GenerationEngine, positions: &[(usize, usize)]) -> Vec<CellId> {
        positions.iter().map(|&(r, c)| engine.grid().index(r, c)).collect()
    }

    #[test]
    fn test_create_rejects_zero_dimensions() {
        assert!(GenerationEngine::new(0, 3, RuleSet::conway()).is_err());
        assert!(GenerationEngine::new(3, 0, RuleSet::conway()).is_err());
    }

    #[test]
    fn test_create_rejects_invalid_rules() {
        let rules = RuleSet {
            populate: vec![3],
            survive: vec![2, 3],
            die: vec![],
        };
        assert!(matches!(
            GenerationEngine::new(3, 3, rules),
            Err(SimError::InvalidRuleSet(_))
        ));
    }

    #[test]
    fn test_set_cells_tracks_last_alive() {
        let mut engine = engine(3, 3);

        assert_eq!(engine.set_cells([4], true), vec![4]);
        let cell = engine.grid().cell(4).unwrap();
        assert!(cell.alive && !cell.last_alive);

        // Already alive: untouched, last_alive not churned
        assert!(engine.set_cells([4], true).is_empty());
        assert!(!engine.grid().cell(4).unwrap().last_alive);

        assert_eq!(engine.set_cells([4], false), vec![4]);
        let cell = engine.grid().cell(4).unwrap();
        assert!(!cell.alive && cell.last_alive);
    }

    #[test]
    fn test_set_cells_ignores_invalid_ids() {
        let mut engine = engine(3, 3);
        let changed = engine.set_cells([0, 9, 100, 8], true);
        assert_eq!(changed, vec![0, 8]);
        assert_eq!(engine.population(), 2);
    }

    #[test]
    fn test_toggle_cell() {
        let mut engine = engine(2, 2);
        assert_eq!(engine.toggle_cell(1), Some(true));
        assert_eq!(engine.toggle_cell(1), Some(false));
        assert_eq!(engine.toggle_cell(4), None);
    }

    #[test]
    fn test_count_live_neighbors_rejects_invalid_id() {
        let engine = engine(3, 3);
        assert_eq!(
            engine.count_live_neighbors(9),
            Err(SimError::InvalidCellId { id: 9, cell_count: 9 })
        );
    }

    #[test]
    fn test_neighbor_count_bounds_on_full_grid() {
        let (width, height) = (5, 4);
        let mut engine = engine(width, height);
        engine.set_cells(0..width * height, true);

        for id in 0..width * height {
            let (row, col) = engine.grid().position(id);
            let on_row_edge = row == 0 || row == height - 1;
            let on_col_edge = col == 0 || col == width - 1;
            let expected = match (on_row_edge, on_col_edge) {
                (true, true) => 3,
                (true, false) | (false, true) => 5,
                (false, false) => 8,
            };
            assert_eq!(
                engine.count_live_neighbors(id).unwrap(),
                expected,
                "cell ({}, {})",
                row,
                col
            );
        }
    }

    #[test]
    fn test_all_dead_stays_dead() {
        let mut engine = engine(6, 4);
        let result = engine.advance();
        assert!(result.is_unchanged());
        assert!(engine.grid().is_empty());
        assert_eq!(result.generation, 1);
    }

    #[test]
    fn test_lone_cell_dies_in_one_advance() {
        let mut engine = engine(5, 5);
        engine.set_cells([12], true);

        let result = engine.advance();
        assert_eq!(result.died, vec![12]);
        assert!(result.born.is_empty());
        assert!(engine.grid().is_empty());
    }

    #[test]
    fn test_block_is_stable() {
        let mut engine = engine(4, 4);
        engine.place_pattern(&presets::block(), 1, 1).unwrap();
        let before = engine.grid().living_ids();

        for _ in 0..10 {
            assert!(engine.advance().is_unchanged());
        }
        assert_eq!(engine.grid().living_ids(), before);
    }

    #[test]
    fn test_with_grid_keeps_existing_cells() {
        let grid = Grid::from_rows(vec![
            vec![false, true, false],
            vec![false, true, false],
            vec![false, true, false],
        ])
        .unwrap();
        let mut engine = GenerationEngine::with_grid(grid, RuleSet::conway()).unwrap();
        assert_eq!(engine.population(), 3);
        assert_eq!(engine.generation(), 0);

        engine.advance();
        assert_eq!(engine.grid().living_ids(), vec![3, 4, 5]);
    }

    #[test]
    fn test_blinker_oscillates_with_period_two() {
        let mut engine = engine(5, 5);
        let horizontal = ids(&engine, &[(2, 1), (2, 2), (2, 3)]);
        let vertical = ids(&engine, &[(1, 2), (2, 2), (3, 2)]);
        engine.set_cells(horizontal.clone(), true);

        let first = engine.advance();
        assert_eq!(engine.grid().living_ids(), vertical);
        assert_eq!(first.born, ids(&engine, &[(1, 2), (3, 2)]));
        assert_eq!(first.died, ids(&engine, &[(2, 1), (2, 3)]));

        engine.advance();
        assert_eq!(engine.grid().living_ids(), horizontal);

        for _ in 0..4 {
            engine.advance();
        }
        assert_eq!(engine.grid().living_ids(), horizontal);
    }

    #[test]
    fn test_snapshot_isolation() {
        // Row of three on a 3x1 board: the left cell dies this generation.
        // Evaluated in place, the middle cell would then see one neighbor and
        // die too; from the snapshot it sees two and survives.
        let mut engine = engine(3, 1);
        engine.set_cells([0, 1, 2], true);

        let result = engine.advance();
        assert_eq!(result.died, vec![0, 2]);
        assert!(engine.grid().alive(1));
    }

    #[test]
    fn test_advance_updates_last_alive_for_every_cell() {
        let mut engine = engine(5, 5);
        let horizontal = ids(&engine, &[(2, 1), (2, 2), (2, 3)]);
        engine.set_cells(horizontal, true);
        let before = engine.grid().snapshot();

        engine.advance();
        for (id, cell) in engine.grid().cells().iter().enumerate() {
            assert_eq!(cell.last_alive, before[id], "cell {}", id);
        }
        // Center stayed alive, so it did not change
        assert!(!engine.grid().cell(12).unwrap().changed());
    }

    #[test]
    fn test_changed_ids_are_sorted() {
        let result = AdvanceResult {
            generation: 1,
            born: vec![1, 7],
            died: vec![3, 4, 9],
        };
        assert_eq!(result.changed_ids(), vec![1, 3, 4, 7, 9]);
        assert_eq!(result.change_count(), 5);
    }

    #[test]
    fn test_clear() {
        let mut engine = engine(4, 4);
        engine.place_pattern(&presets::block(), 0, 0).unwrap();
        engine.advance();

        let killed = engine.clear();
        assert_eq!(killed, vec![0, 1, 4, 5]);
        assert!(engine.grid().is_empty());
        assert_eq!(engine.generation(), 0);
        assert!(engine.clear().is_empty());
    }

    #[test]
    fn test_glider_moves_diagonally() {
        let mut engine = engine(8, 8);
        engine.place_pattern(&presets::glider(), 0, 0).unwrap();
        let start: Vec<_> = engine.grid().living_ids();

        engine.advance_by(4);
        let shifted: Vec<_> = start.iter().map(|id| id + 8 + 1).collect();
        assert_eq!(engine.grid().living_ids(), shifted);
    }

    #[test]
    fn test_seeds_rule_kills_everything_alive() {
        let mut engine = GenerationEngine::new(4, 4, RuleSet::seeds()).unwrap();
        engine.place_pattern(&presets::block(), 1, 1).unwrap();
        let result = engine.advance();
        assert_eq!(result.died.len(), 4);
    }
}
