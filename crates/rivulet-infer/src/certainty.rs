//! Per-cell belief about the hidden terrain.

use rivulet_core::TerrainType;
use rivulet_grid::{Grid, Position};

/// What is known about one cell.
///
/// A cell is *obvious* when it is resolved and its probability is exactly
/// 0 (ground) or 1 (water). Estimates are never obvious, even at 0 or 1.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum TerrainCertainty {
    /// Nothing is known.
    #[default]
    Unknown,
    /// Probability of water in `[0, 1]`.
    Known {
        /// Probability that the cell is water.
        water: f64,
        /// Whether the value was observed or deduced rather than estimated.
        resolved: bool,
    },
}

impl TerrainCertainty {
    /// A resolved cell of the given terrain.
    pub fn obvious(terrain: TerrainType) -> Self {
        Self::Known {
            water: terrain.water_probability(),
            resolved: true,
        }
    }

    /// An unresolved estimate, clamped to `[0, 1]`.
    pub fn estimate(water: f64) -> Self {
        Self::Known {
            water: water.clamp(0.0, 1.0),
            resolved: false,
        }
    }

    /// Probability of water, if any has been assigned.
    pub fn probability(&self) -> Option<f64> {
        match *self {
            Self::Unknown => None,
            Self::Known { water, .. } => Some(water),
        }
    }

    /// Whether any probability has been assigned.
    pub fn has_probability(&self) -> bool {
        matches!(self, Self::Known { .. })
    }

    /// The terrain this cell is known to be, if obvious.
    pub fn terrain(&self) -> Option<TerrainType> {
        match *self {
            Self::Known {
                water,
                resolved: true,
            } if water == 1.0 => Some(TerrainType::Water),
            Self::Known {
                water,
                resolved: true,
            } if water == 0.0 => Some(TerrainType::Ground),
            _ => None,
        }
    }

    /// Whether the cell is known water or known ground.
    pub fn is_obvious(&self) -> bool {
        self.terrain().is_some()
    }

    /// Whether the cell is known water.
    pub fn is_water(&self) -> bool {
        self.terrain() == Some(TerrainType::Water)
    }

    /// Whether the cell is known ground.
    pub fn is_ground(&self) -> bool {
        self.terrain() == Some(TerrainType::Ground)
    }

    /// Resolve the cell to `terrain`.
    ///
    /// Returns `Ok(true)` when the cell changed. An obvious cell of the
    /// other terrain is left untouched and its terrain returned as `Err`.
    pub fn set_obvious(&mut self, terrain: TerrainType) -> Result<bool, TerrainType> {
        match self.terrain() {
            Some(existing) if existing == terrain => Ok(false),
            Some(existing) => Err(existing),
            None => {
                *self = Self::obvious(terrain);
                Ok(true)
            }
        }
    }

    /// Raise the estimate to `water` if that is higher. Obvious cells are
    /// not affected.
    pub fn add_probability(&mut self, water: f64) {
        if self.is_obvious() {
            return;
        }
        let current = self.probability().unwrap_or(0.0);
        *self = Self::estimate(current.max(water));
    }

    /// Forget any estimate. Obvious cells are not affected.
    pub fn reset(&mut self) {
        if !self.is_obvious() {
            *self = Self::Unknown;
        }
    }
}

impl From<TerrainType> for TerrainCertainty {
    fn from(terrain: TerrainType) -> Self {
        Self::obvious(terrain)
    }
}

impl From<Option<TerrainType>> for TerrainCertainty {
    fn from(terrain: Option<TerrainType>) -> Self {
        terrain.map_or(Self::Unknown, Self::obvious)
    }
}

/// Build an observation of `truth` where only `revealed` cells are known.
///
/// Revealed positions outside the grid are ignored.
pub fn observe<I>(truth: &Grid<TerrainType>, revealed: I) -> Grid<TerrainCertainty>
where
    I: IntoIterator<Item = Position>,
{
    let mut observation = Grid::new(truth.width(), truth.height());
    for position in revealed {
        if let (Some(&terrain), Some(slot)) = (truth.get(position), observation.get_mut(position)) {
            *slot = TerrainCertainty::obvious(terrain);
        }
    }
    observation
}

/// Observation with every cell of `truth` revealed.
pub fn reveal_all(truth: &Grid<TerrainType>) -> Grid<TerrainCertainty> {
    truth.map(|&t| TerrainCertainty::obvious(t))
}
