//! File I/O operations for patterns and grids

use super::{Grid, Pattern};
use anyhow::{Context, Result};
use std::path::Path;

/// Load a pattern from a text file
/// Format: each line is a row, with '1' (or '#') for alive cells and '0' (or '.')
/// for dead cells
pub fn load_pattern_from_file<P: AsRef<Path>>(path: P) -> Result<Pattern> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read pattern file: {}", path.display()))?;

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unnamed");

    parse_pattern_from_string(name, &content)
        .with_context(|| format!("Failed to parse pattern from file: {}", path.display()))
}

/// Parse a pattern from a string representation
pub fn parse_pattern_from_string(name: &str, content: &str) -> Result<Pattern> {
    let lines: Vec<&str> = content
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect();

    if lines.is_empty() {
        anyhow::bail!("Pattern is empty or contains no valid rows");
    }

    let width = lines[0].chars().count();
    let mut rows = Vec::with_capacity(lines.len());

    for (row_idx, line) in lines.iter().enumerate() {
        let row_len = line.chars().count();
        if row_len != width {
            anyhow::bail!(
                "Row {} has length {}, expected {} (all rows must have the same length)",
                row_idx,
                row_len,
                width
            );
        }

        let mut row = Vec::with_capacity(width);
        for (col_idx, ch) in line.chars().enumerate() {
            match ch {
                '0' | '.' => row.push(false),
                '1' | '#' => row.push(true),
                _ => anyhow::bail!(
                    "Invalid character '{}' at position ({}, {}). \
                     Only '0'/'.' and '1'/'#' are allowed",
                    ch,
                    row_idx,
                    col_idx
                ),
            }
        }
        rows.push(row);
    }

    Ok(Pattern::from_rows(name, &rows))
}

/// Save the alive state of a grid to a text file
pub fn save_grid_to_file<P: AsRef<Path>>(grid: &Grid, path: P) -> Result<()> {
    let content = grid_to_string(grid);

    // Create parent directories if they don't exist
    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write grid to file: {}", path.as_ref().display()))?;

    Ok(())
}

/// Convert a grid to its '0'/'1' string representation
pub fn grid_to_string(grid: &Grid) -> String {
    let (width, height) = grid.dimensions();
    let mut result = String::with_capacity(height * (width + 1));

    for row in 0..height {
        for col in 0..width {
            result.push(if grid.get(row, col) { '1' } else { '0' });
        }
        result.push('\n');
    }

    result
}

/// Load every `.txt` pattern in a directory, sorted by name
pub fn load_patterns_from_directory<P: AsRef<Path>>(dir_path: P) -> Result<Vec<Pattern>> {
    let dir = std::fs::read_dir(&dir_path)
        .with_context(|| format!("Failed to read directory: {}", dir_path.as_ref().display()))?;

    let mut patterns = Vec::new();

    for entry in dir {
        let entry = entry.context("Failed to read directory entry")?;
        let path = entry.path();

        if path.is_file() && path.extension().is_some_and(|ext| ext == "txt") {
            match load_pattern_from_file(&path) {
                Ok(pattern) => patterns.push(pattern),
                Err(e) => log::warn!("Failed to load {}: {:#}", path.display(), e),
            }
        }
    }

    patterns.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(patterns)
}

/// Create example pattern files
pub fn create_example_patterns<P: AsRef<Path>>(output_dir: P) -> Result<()> {
    let dir = output_dir.as_ref();
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let examples = [
        ("glider.txt", "010\n001\n111\n"),
        ("blinker.txt", "000\n111\n000\n"),
        ("block.txt", "0000\n0110\n0110\n0000\n"),
        ("beacon.txt", "1100\n1000\n0001\n0011\n"),
        ("r_pentomino.txt", "011\n110\n010\n"),
    ];

    for (file_name, content) in examples {
        std::fs::write(dir.join(file_name), content)
            .with_context(|| format!("Failed to write {}", file_name))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_pattern_from_string() {
        let pattern = parse_pattern_from_string("plus", "010\n101\n010\n").unwrap();

        assert_eq!(pattern.width, 3);
        assert_eq!(pattern.height, 3);
        assert_eq!(pattern.cells, vec![(0, 1), (1, 0), (1, 2), (2, 1)]);
    }

    #[test]
    fn test_parse_accepts_dot_hash() {
        let pattern = parse_pattern_from_string("glider", ".#.\n..#\n###\n").unwrap();
        assert_eq!(pattern.population(), 5);
    }

    #[test]
    fn test_grid_to_string() {
        let rows = vec![
            vec![false, true, false],
            vec![true, false, true],
        ];
        let grid = Grid::from_rows(rows).unwrap();
        assert_eq!(grid_to_string(&grid), "010\n101\n");
    }

    #[test]
    fn test_save_grid() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("nested/grid.txt");

        let grid = Grid::from_rows(vec![vec![true, false], vec![false, true]]).unwrap();
        save_grid_to_file(&grid, &file_path).unwrap();

        let loaded = load_pattern_from_file(&file_path).unwrap();
        assert_eq!(loaded.name, "grid");
        assert_eq!((loaded.width, loaded.height), (2, 2));
        assert_eq!(loaded.cells, vec![(0, 0), (1, 1)]);
    }

    #[test]
    fn test_invalid_input() {
        // Invalid character
        assert!(parse_pattern_from_string("x", "010\n1X1\n010\n").is_err());

        // Inconsistent row lengths
        assert!(parse_pattern_from_string("x", "010\n11\n010\n").is_err());

        // Empty content
        assert!(parse_pattern_from_string("x", "\n\n").is_err());
    }

    #[test]
    fn test_create_and_load_examples() {
        let temp_dir = tempdir().unwrap();
        create_example_patterns(temp_dir.path()).unwrap();
        std::fs::write(temp_dir.path().join("broken.txt"), "01\n2\n").unwrap();
        std::fs::write(temp_dir.path().join("notes.md"), "ignored").unwrap();

        let patterns = load_patterns_from_directory(temp_dir.path()).unwrap();
        let names: Vec<_> = patterns.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["beacon", "blinker", "block", "glider", "r_pentomino"]);

        let glider = &patterns[3];
        assert_eq!(glider.population(), 5);
    }
}
