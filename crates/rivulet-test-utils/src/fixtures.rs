//! Reusable maps and observation masks.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rivulet_grid::{Grid, Position};

/// A 16x16 river of 29 cells entering at `(0, 4)` and leaving at
/// `(15, 11)`, shaped the way the generator with default settings shapes
/// rivers: straight through the near-edge band, thin, never touching
/// itself.
pub const MEANDER_16: &str = "
    ................
    ................
    ................
    ................
    ~~~~~~..........
    .....~..~~~~....
    .....~..~..~....
    .....~..~..~....
    .....~~~~..~....
    ...........~....
    ...........~....
    ...........~~~~~
    ................
    ................
    ................
    ................
";

/// Entrance of [`MEANDER_16`].
pub const MEANDER_16_ENTRANCE: Position = Position::new(0, 4);

/// Exit of [`MEANDER_16`].
pub const MEANDER_16_EXIT: Position = Position::new(15, 11);

/// Each cell of `grid` independently with probability `fraction`, row by
/// row, reproducibly for `seed`.
pub fn sample_positions<T>(grid: &Grid<T>, fraction: f64, seed: u64) -> Vec<Position> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let fraction = fraction.clamp(0.0, 1.0);
    grid.positions()
        .filter(|_| rng.random_bool(fraction))
        .collect()
}

/// Every cell of `grid` at Manhattan distance `radius` or less from
/// `center`.
pub fn diamond<T>(grid: &Grid<T>, center: Position, radius: i32) -> Vec<Position> {
    grid.positions()
        .filter(|p| p.distance_to(center) <= radius)
        .collect()
}

/// Every cell of `grid` except those in `hidden`.
pub fn all_but<T>(grid: &Grid<T>, hidden: &[Position]) -> Vec<Position> {
    grid.positions().filter(|p| !hidden.contains(p)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sampling_is_reproducible() {
        let grid: Grid<u8> = Grid::new(10, 10);
        let a = sample_positions(&grid, 0.3, 7);
        let b = sample_positions(&grid, 0.3, 7);
        assert_eq!(a, b);
        assert!(sample_positions(&grid, 0.0, 7).is_empty());
        assert_eq!(sample_positions(&grid, 1.0, 7).len(), 100);
    }

    #[test]
    fn diamond_is_clipped_to_the_grid() {
        let grid: Grid<u8> = Grid::new(5, 5);
        assert_eq!(diamond(&grid, Position::new(0, 0), 1).len(), 3);
        assert_eq!(diamond(&grid, Position::new(2, 2), 1).len(), 5);
        assert_eq!(all_but(&grid, &[Position::new(1, 1)]).len(), 24);
    }
}
