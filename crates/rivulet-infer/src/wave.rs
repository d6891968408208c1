//! Wave identifiers and per-pass reports.

use rivulet_core::TerrainType;
use std::fmt;

/// One deduction pass of the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Wave {
    /// Near-edge band elimination.
    Edge,
    /// Local neighbourhood patterns.
    Local,
    /// Reachability of dangling water endpoints.
    Connectivity,
    /// Probabilistic path enumeration.
    Paths,
    /// Uniform share of the remaining water budget.
    Finalization,
}

impl Wave {
    /// The four deduction waves, in the order the engine tries them.
    pub const DEDUCTIONS: [Wave; 4] = [Wave::Edge, Wave::Local, Wave::Connectivity, Wave::Paths];

    /// 1-based wave number; finalization is 5.
    pub fn number(self) -> u8 {
        match self {
            Self::Edge => 1,
            Self::Local => 2,
            Self::Connectivity => 3,
            Self::Paths => 4,
            Self::Finalization => 5,
        }
    }
}

impl fmt::Display for Wave {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finalization => write!(f, "final wave"),
            other => write!(f, "wave {}", other.number()),
        }
    }
}

/// What a single wave pass resolved.
#[derive(Clone, Debug, PartialEq)]
pub struct WaveReport {
    /// Which wave ran.
    pub wave: Wave,
    /// Cells newly resolved to ground.
    pub ground_found: usize,
    /// Cells newly resolved to water.
    pub water_found: usize,
}

impl WaveReport {
    /// Empty report for `wave`.
    pub fn new(wave: Wave) -> Self {
        Self {
            wave,
            ground_found: 0,
            water_found: 0,
        }
    }

    /// Count one newly resolved cell.
    pub fn found(&mut self, terrain: TerrainType) {
        match terrain {
            TerrainType::Ground => self.ground_found += 1,
            TerrainType::Water => self.water_found += 1,
        }
    }

    /// Whether the pass resolved anything.
    pub fn changed(&self) -> bool {
        self.ground_found + self.water_found > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbering_follows_order() {
        let numbers: Vec<u8> = Wave::DEDUCTIONS.iter().map(|w| w.number()).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
        assert_eq!(Wave::Finalization.to_string(), "final wave");
        assert_eq!(Wave::Connectivity.to_string(), "wave 3");
    }

    #[test]
    fn report_counts_by_terrain() {
        let mut report = WaveReport::new(Wave::Local);
        assert!(!report.changed());
        report.found(TerrainType::Ground);
        report.found(TerrainType::Ground);
        report.found(TerrainType::Water);
        assert_eq!(report.ground_found, 2);
        assert_eq!(report.water_found, 1);
        assert!(report.changed());
    }
}
