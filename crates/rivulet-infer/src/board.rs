//! The working grid of beliefs shared by every wave.

use crate::certainty::TerrainCertainty;
use crate::error::InferenceError;
use crate::wave::WaveReport;
use rivulet_core::{RiverParameters, TerrainType};
use rivulet_grid::{Grid, Position};
use smallvec::SmallVec;

/// Beliefs plus the river parameters they are judged against.
pub(crate) struct Board<'p> {
    pub(crate) grid: Grid<TerrainCertainty>,
    pub(crate) params: &'p RiverParameters,
}

impl<'p> Board<'p> {
    pub(crate) fn new(grid: Grid<TerrainCertainty>, params: &'p RiverParameters) -> Self {
        Self { grid, params }
    }

    /// Width of the near-edge band.
    pub(crate) fn band(&self) -> i32 {
        self.params.min_edge_distance
    }

    pub(crate) fn at(&self, position: Position) -> TerrainCertainty {
        self.grid.get(position).copied().unwrap_or_default()
    }

    pub(crate) fn is_water(&self, position: Position) -> bool {
        self.at(position).is_water()
    }

    pub(crate) fn is_ground(&self, position: Position) -> bool {
        self.at(position).is_ground()
    }

    pub(crate) fn is_obvious(&self, position: Position) -> bool {
        self.at(position).is_obvious()
    }

    pub(crate) fn is_on_edge(&self, position: Position) -> bool {
        self.grid.is_on_edge(position)
    }

    pub(crate) fn edge_distance(&self, position: Position) -> i32 {
        self.grid.edge_distance(position)
    }

    /// In-grid orthogonal neighbours, top, left, right, bottom.
    pub(crate) fn immediates(&self, position: Position) -> SmallVec<[Position; 4]> {
        self.grid
            .get_cell(position)
            .map(|c| c.immediates().iter().map(|n| n.position()).collect())
            .unwrap_or_default()
    }

    /// In-grid diagonal neighbours.
    pub(crate) fn diagonals(&self, position: Position) -> SmallVec<[Position; 4]> {
        self.grid
            .get_cell(position)
            .map(|c| c.diagonals().iter().map(|n| n.position()).collect())
            .unwrap_or_default()
    }

    /// In-grid surrounding cells.
    pub(crate) fn surrounding(&self, position: Position) -> SmallVec<[Position; 8]> {
        self.grid
            .get_cell(position)
            .map(|c| c.surrounding().iter().map(|n| n.position()).collect())
            .unwrap_or_default()
    }

    /// In-grid diagonals whose shared immediates all satisfy `predicate`.
    pub(crate) fn diagonals_where_shared(
        &self,
        position: Position,
        predicate: impl Fn(&TerrainCertainty) -> bool,
    ) -> SmallVec<[Position; 4]> {
        self.grid
            .get_cell(position)
            .map(|c| {
                c.diagonals_where_shared_immediates(|s| predicate(s.value()))
                    .iter()
                    .map(|d| d.position())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub(crate) fn count_immediates(
        &self,
        position: Position,
        predicate: impl Fn(&TerrainCertainty) -> bool,
    ) -> usize {
        self.immediates(position)
            .iter()
            .filter(|&&n| predicate(&self.at(n)))
            .count()
    }

    /// Water neighbours a river cell at `position` still lacks: one on
    /// the edge, two elsewhere, minus the known water immediates.
    pub(crate) fn missing_water(&self, position: Position) -> i32 {
        let required = if self.is_on_edge(position) { 1 } else { 2 };
        required - self.count_immediates(position, TerrainCertainty::is_water) as i32
    }

    /// Known water cells, row by row.
    pub(crate) fn water_cells(&self) -> Vec<Position> {
        self.positions_where(TerrainCertainty::is_water)
    }

    /// Positions whose belief satisfies `predicate`, row by row.
    pub(crate) fn positions_where(
        &self,
        predicate: impl Fn(&TerrainCertainty) -> bool,
    ) -> Vec<Position> {
        self.grid
            .positions()
            .filter(|&p| predicate(&self.at(p)))
            .collect()
    }

    /// Edge positions, row by row.
    pub(crate) fn edge_positions(&self) -> Vec<Position> {
        self.grid.edge_cells().iter().map(|c| c.position()).collect()
    }

    /// Resolve `position` to `terrain`, counting it in `report`.
    ///
    /// # Errors
    ///
    /// [`InferenceError::Contradiction`] when the cell is already known to
    /// be the other terrain.
    pub(crate) fn resolve(
        &mut self,
        position: Position,
        terrain: TerrainType,
        report: &mut WaveReport,
    ) -> Result<bool, InferenceError> {
        let Some(slot) = self.grid.get_mut(position) else {
            return Ok(false);
        };
        match slot.set_obvious(terrain) {
            Ok(true) => {
                report.found(terrain);
                tracing::trace!(
                    target: "rivulet::infer",
                    x = position.x,
                    y = position.y,
                    %terrain,
                    wave = report.wave.number(),
                    "infer.resolve"
                );
                Ok(true)
            }
            Ok(false) => Ok(false),
            Err(existing) => Err(InferenceError::Contradiction {
                position,
                existing,
                attempted: terrain,
                wave: report.wave,
            }),
        }
    }

    /// The band strip through `position`: the cell itself plus the chain
    /// of band cells running perpendicular to the boundary, one per edge
    /// distance below `width`. Empty when `position` is outside the band.
    pub(crate) fn band_strip(&self, position: Position, width: i32) -> Vec<Position> {
        if !self.grid.contains(position) || self.edge_distance(position) >= width {
            return Vec::new();
        }
        let mut strip = vec![position];
        let mut grew = true;
        while grew {
            grew = false;
            for i in 0..strip.len() {
                for n in self.immediates(strip[i]) {
                    let distance = self.edge_distance(n);
                    if distance < width && !strip.iter().any(|&s| self.edge_distance(s) == distance) {
                        strip.push(n);
                        grew = true;
                    }
                }
            }
        }
        strip
    }

    /// Cells no river end may occupy near `corner`: boundary cells closer
    /// than `width` along the boundary, plus their band strips. Empty
    /// unless `corner` is a corner.
    pub(crate) fn corner_zone(&self, corner: Position, width: i32) -> Vec<Position> {
        if !self.grid.contains(corner) || !self.grid.is_on_corner(corner) {
            return Vec::new();
        }
        let mut zone = vec![corner];
        let mut grew = true;
        while grew {
            grew = false;
            for i in 0..zone.len() {
                for n in self.immediates(zone[i]) {
                    if n.distance_to(corner) < width && self.edge_distance(n) == 0 && !zone.contains(&n) {
                        zone.push(n);
                        grew = true;
                    }
                }
            }
        }
        for i in 0..zone.len() {
            for s in self.band_strip(zone[i], width) {
                if !zone.contains(&s) {
                    zone.push(s);
                }
            }
        }
        zone
    }
}
