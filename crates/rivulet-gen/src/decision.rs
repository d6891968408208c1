//! Per-cell placement decisions, kept for diagnostics.

use rivulet_grid::Position;
use std::fmt;

/// How the next cell was picked among the surviving candidates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Move towards the exit.
    Closest,
    /// Move away from the exit.
    Furthest,
    /// Move away from the map edge.
    Center,
    /// Only one candidate survived filtering.
    Forced,
    /// Uniform pick among all candidates.
    Any,
}

impl Strategy {
    /// Single-glyph marker used in decision summaries.
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Closest => ">",
            Self::Furthest => "<",
            Self::Center => "o",
            Self::Forced => ".",
            Self::Any => "x",
        }
    }
}

/// Record of one placed cell.
#[derive(Clone, Debug, PartialEq)]
pub struct PathDecision {
    /// The placed cell.
    pub position: Position,
    /// Strategy that selected it.
    pub strategy: Strategy,
    /// Candidates that survived filtering.
    pub candidate_count: usize,
    /// Spare length available when the decision was made.
    pub slack: i32,
    /// Whether the move into this cell was horizontal.
    pub horizontal: bool,
    /// Why the strategy was chosen.
    pub comment: String,
}

impl fmt::Display for PathDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] [{}] {} {:?}/{} ({})",
            self.strategy.glyph(),
            if self.horizontal { "--" } else { " |" },
            self.position,
            self.strategy,
            self.candidate_count,
            self.slack
        )?;
        if !self.comment.is_empty() {
            write!(f, " {}", self.comment)?;
        }
        Ok(())
    }
}
