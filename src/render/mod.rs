//! Render collaborators

use crate::game_of_life::{CellId, Grid};

pub mod terminal;

pub use terminal::TerminalRenderer;

/// Receives the grid after every change.
///
/// `changed` lists the ids that flipped since the previous render; `None`
/// asks for a full redraw.
pub trait Renderer {
    fn render(&mut self, grid: &Grid, changed: Option<&[CellId]>);
}

/// Renderer that draws nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _grid: &Grid, _changed: Option<&[CellId]>) {}
}
