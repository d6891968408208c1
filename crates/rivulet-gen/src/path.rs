//! The generated river.

use crate::decision::PathDecision;
use rivulet_core::TerrainType;
use rivulet_grid::{Grid, Position};

/// A successfully generated river.
#[derive(Clone, Debug, PartialEq)]
pub struct RiverPath {
    /// Grid width the river was generated for.
    pub width: i32,
    /// Grid height the river was generated for.
    pub height: i32,
    /// Water cells from entrance to exit.
    pub positions: Vec<Position>,
    /// One decision per placed cell, entrance included.
    pub decisions: Vec<PathDecision>,
    /// First cell, on the boundary.
    pub entrance: Position,
    /// Last cell, on the boundary.
    pub exit: Position,
    /// Target length after adjusting for the actual end distance.
    pub target_water_cells: i32,
    /// Zero-based index of the attempt that produced this river.
    pub attempt: u32,
    /// Seed of that attempt.
    pub seed: u64,
}

impl RiverPath {
    /// Number of water cells.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the path is empty. Never true for a generated river.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Ground-truth terrain: water on the path, ground elsewhere.
    pub fn terrain(&self) -> Grid<TerrainType> {
        let mut grid = Grid::filled(self.width, self.height, TerrainType::Ground);
        for p in &self.positions {
            if let Some(cell) = grid.get_mut(*p) {
                *cell = TerrainType::Water;
            }
        }
        grid
    }

    /// Text preview, one line per row: `~` for water, `.` for ground.
    pub fn preview(&self) -> String {
        self.terrain().to_text(
            |c| match c.value() {
                TerrainType::Water => "~".to_string(),
                TerrainType::Ground => ".".to_string(),
            },
            None,
        )
    }

    /// Decision history, one line per placed cell.
    pub fn decision_summary(&self) -> String {
        summarize_decisions(&self.decisions)
    }
}

pub(crate) fn summarize_decisions(decisions: &[PathDecision]) -> String {
    decisions
        .iter()
        .enumerate()
        .map(|(i, d)| format!("{i}: {d}"))
        .collect::<Vec<_>>()
        .join("\n")
}
