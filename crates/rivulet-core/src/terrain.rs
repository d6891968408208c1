//! Terrain kinds placed on a map.

use std::fmt;

/// What occupies a single map cell.
///
/// `Ground` is the default so that a freshly allocated map is dry land
/// until a river is carved into it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TerrainType {
    /// Dry land.
    #[default]
    Ground,
    /// Part of the river.
    Water,
}

impl TerrainType {
    /// Probability of water that an observed cell of this kind pins to.
    pub fn water_probability(self) -> f64 {
        match self {
            Self::Ground => 0.0,
            Self::Water => 1.0,
        }
    }

    /// Whether this is [`TerrainType::Water`].
    pub fn is_water(self) -> bool {
        self == Self::Water
    }
}

impl fmt::Display for TerrainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ground => write!(f, "ground"),
            Self::Water => write!(f, "water"),
        }
    }
}
