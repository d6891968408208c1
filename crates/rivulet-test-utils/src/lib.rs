//! Test utilities for Rivulet development.
//!
//! Maps are written as ASCII art, one row per line: `~` is water, `.` is
//! ground and `?` is an unobserved cell. Whitespace inside a line is
//! ignored, so rows may be spaced out for readability.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use rivulet_core::{RecordingSink, TerrainType};
use rivulet_grid::{Grid, Position};

/// Parse an ASCII map where `?` marks an unobserved cell.
///
/// # Panics
///
/// On an unknown glyph or ragged rows.
pub fn parse_cells(text: &str) -> Grid<Option<TerrainType>> {
    let rows: Vec<Vec<Option<TerrainType>>> = text
        .lines()
        .map(|line| line.chars().filter(|c| !c.is_whitespace()).collect::<Vec<_>>())
        .filter(|row| !row.is_empty())
        .map(|row| row.into_iter().map(glyph).collect())
        .collect();
    Grid::from_rows(rows).expect("map rows must all have the same length")
}

/// Parse a fully observed ASCII map.
///
/// # Panics
///
/// On `?`, an unknown glyph, or ragged rows.
pub fn parse_truth(text: &str) -> Grid<TerrainType> {
    parse_cells(text).map(|c| c.expect("ground truth cannot contain `?`"))
}

/// Render a partially observed map with the glyphs [`parse_cells`] reads.
pub fn render_cells(grid: &Grid<Option<TerrainType>>) -> String {
    grid.to_text(
        |c| match c.value() {
            Some(TerrainType::Water) => "~".to_string(),
            Some(TerrainType::Ground) => ".".to_string(),
            None => "?".to_string(),
        },
        None,
    )
}

/// Positions of every water cell, row by row.
pub fn water_positions(truth: &Grid<TerrainType>) -> Vec<Position> {
    truth
        .positions()
        .filter(|&p| truth[p] == TerrainType::Water)
        .collect()
}

/// Names of every scope below `sink`, depth first.
pub fn scope_names(sink: &RecordingSink) -> Vec<String> {
    let mut names = Vec::new();
    for child in &sink.children {
        names.push(child.name.clone());
        names.extend(scope_names(child));
    }
    names
}

fn glyph(c: char) -> Option<TerrainType> {
    match c {
        '~' => Some(TerrainType::Water),
        '.' => Some(TerrainType::Ground),
        '?' => None,
        other => panic!("unknown map glyph {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_renders_back() {
        let text = "~ . ?\n. ~ .\n";
        let grid = parse_cells(text);
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid[Position::new(2, 0)], None);
        assert_eq!(grid[Position::new(1, 1)], Some(TerrainType::Water));
        assert_eq!(render_cells(&grid), "~.?\n.~.");
    }

    #[test]
    fn meander_fixture_is_a_single_river() {
        let truth = parse_truth(fixtures::MEANDER_16);
        assert_eq!(truth.width(), 16);
        assert_eq!(truth.height(), 16);
        assert_eq!(water_positions(&truth).len(), 29);
    }

    #[test]
    fn scope_names_walk_depth_first() {
        let mut root = RecordingSink::new("root");
        let mut a = RecordingSink::new("a");
        a.children.push(RecordingSink::new("a1"));
        root.children.push(a);
        root.children.push(RecordingSink::new("b"));
        assert_eq!(scope_names(&root), vec!["a", "a1", "b"]);
    }
}
