//! Full-frame terminal renderer

use super::Renderer;
use crate::game_of_life::{CellId, Grid};
use crate::utils::GridFormatter;
use std::io::{self, Write};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Redraws the whole board on each render call
pub struct TerminalRenderer<W: Write> {
    out: W,
    clear_screen: bool,
    show_status: bool,
    frames: u64,
    error: Option<io::Error>,
}

impl TerminalRenderer<io::Stdout> {
    pub fn stdout(show_status: bool) -> Self {
        Self::new(io::stdout(), true, show_status)
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, clear_screen: bool, show_status: bool) -> Self {
        Self {
            out,
            clear_screen,
            show_status,
            frames: 0,
            error: None,
        }
    }

    /// Number of frames drawn
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// The first write error, if drawing has failed
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw(&mut self, grid: &Grid, changed: Option<&[CellId]>) -> io::Result<()> {
        if self.clear_screen {
            write!(self.out, "{}", CLEAR_SCREEN)?;
        }
        write!(self.out, "{}", GridFormatter::format_grid_compact(grid))?;
        if self.show_status {
            let changed = changed.map_or_else(|| "all".to_string(), |ids| ids.len().to_string());
            writeln!(
                self.out,
                "Population {} | Changed {}",
                grid.living_count(),
                changed
            )?;
        }
        self.out.flush()
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, grid: &Grid, changed: Option<&[CellId]>) {
        if self.error.is_some() {
            return;
        }

        match self.draw(grid, changed) {
            Ok(()) => self.frames += 1,
            Err(e) => {
                log::error!("terminal render failed: {}", e);
                self.error = Some(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_board_and_status() {
        let grid = Grid::from_rows(vec![vec![true, false], vec![false, true]]).unwrap();
        let mut renderer = TerminalRenderer::new(Vec::new(), false, true);

        renderer.render(&grid, None);
        renderer.render(&grid, Some(&[0, 3][..]));
        assert_eq!(renderer.frames(), 2);

        let output = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(
            output,
            "█·\n·█\nPopulation 2 | Changed all\n█·\n·█\nPopulation 2 | Changed 2\n"
        );
    }

    #[test]
    fn test_clear_screen_prefix() {
        let grid = Grid::new(1, 1).unwrap();
        let mut renderer = TerminalRenderer::new(Vec::new(), true, false);
        renderer.render(&grid, None);

        let output = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(output, format!("{}·\n", CLEAR_SCREEN));
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_error_is_kept() {
        let grid = Grid::new(2, 2).unwrap();
        let mut renderer = TerminalRenderer::new(BrokenPipe, false, false);
        renderer.render(&grid, None);
        renderer.render(&grid, None);

        assert_eq!(renderer.frames(), 0);
        assert_eq!(renderer.take_error().unwrap().kind(), io::ErrorKind::BrokenPipe);
        assert!(renderer.take_error().is_none());
    }
}
