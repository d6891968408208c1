//! The wave loop.

use crate::board::Board;
use crate::certainty::TerrainCertainty;
use crate::config::InferenceConfig;
use crate::connectivity::prune_unreachable;
use crate::edge::manage_edge;
use crate::error::InferenceError;
use crate::estimate::{apply_overall_probabilities, remaining_water, RemainingEstimate};
use crate::local::spread_obviousness;
use crate::paths::spread_partial_certainties;
use crate::wave::{Wave, WaveReport};
use rivulet_core::{ConfigError, RiverParameters, RiverSettings, StatsSink};
use rivulet_grid::{Grid, Size};

// ── InferenceOutcome ───────────────────────────────────────────────

/// Result of one [`TerrainInference::infer`] call.
#[derive(Clone, Debug)]
pub struct InferenceOutcome {
    /// Probability of water per cell. Obvious cells are exactly 0 or 1.
    pub probabilities: Grid<f64>,
    /// Final belief per cell.
    pub certainty: Grid<TerrainCertainty>,
    /// Every wave pass that ran, in order. Empty when the observation was
    /// already fully resolved.
    pub waves: Vec<WaveReport>,
    /// Undiscovered water estimated before the final wave spread it.
    pub remaining_estimate: RemainingEstimate,
}

impl InferenceOutcome {
    /// Cells resolved by any wave, per terrain: `(ground, water)`.
    pub fn resolved_counts(&self) -> (usize, usize) {
        self.waves.iter().fold((0, 0), |(g, w), r| {
            (g + r.ground_found, w + r.water_found)
        })
    }
}

// ── TerrainInference ───────────────────────────────────────────────

/// Deduces hidden river cells from a partial observation.
///
/// The engine repeatedly runs its deduction waves, cheapest first, and
/// restarts from the top whenever a wave resolves a cell:
///
/// 1. edge elimination, repeated until it stops changing anything
///    (skipped when the river may touch the edge anywhere);
/// 2. local neighbourhood patterns;
/// 3. reachability of dangling water endpoints;
/// 4. probabilistic path enumeration.
///
/// When a full pass changes nothing, the remaining water budget is spread
/// over the cells still without a probability.
#[derive(Clone, Debug)]
pub struct TerrainInference {
    params: RiverParameters,
    config: InferenceConfig,
}

impl TerrainInference {
    /// Engine for grids matching `params`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `config` fails validation.
    pub fn new(params: RiverParameters, config: InferenceConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { params, config })
    }

    /// Engine for a `width x height` grid, deriving parameters from
    /// `settings` the way the generator does.
    pub fn for_grid(
        settings: &RiverSettings,
        width: i32,
        height: i32,
        config: InferenceConfig,
    ) -> Result<Self, ConfigError> {
        Self::new(settings.derive(width, height)?, config)
    }

    /// The river parameters observations are judged against.
    pub fn parameters(&self) -> &RiverParameters {
        &self.params
    }

    /// The engine configuration.
    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    /// Infer the water probability of every cell of `observation`.
    ///
    /// # Errors
    ///
    /// [`InferenceError::SizeMismatch`] when the observation does not match
    /// the parameters' grid size, [`InferenceError::Contradiction`] when
    /// the observation cannot belong to a river with these parameters.
    pub fn infer(
        &self,
        observation: Grid<TerrainCertainty>,
        sink: &mut dyn StatsSink,
    ) -> Result<InferenceOutcome, InferenceError> {
        let expected = Size::new(self.params.width, self.params.height);
        if observation.size() != expected {
            return Err(InferenceError::SizeMismatch {
                expected,
                actual: observation.size(),
            });
        }

        let mut stats = sink.start_child_scope("terrain inference");
        stats.record_value("waves to use", self.config.waves_to_use as f64);

        let mut board = Board::new(observation, &self.params);
        let mut waves = Vec::new();

        if board.grid.iter().all(TerrainCertainty::is_obvious) {
            stats.record_comment("observation fully resolved");
            let remaining_estimate = remaining_water(&board);
            return Ok(finish(board, waves, remaining_estimate));
        }

        loop {
            let mut changed = false;

            if self.config.uses(1) && board.band() > 0 {
                loop {
                    let report = manage_edge(&mut board)?;
                    let again = report.changed();
                    record(&mut *stats, &mut waves, report);
                    if !again {
                        break;
                    }
                    changed = true;
                }
            }
            if changed {
                continue;
            }

            if self.config.uses(2) {
                let report = spread_obviousness(&mut board)?;
                changed = report.changed();
                record(&mut *stats, &mut waves, report);
                if changed {
                    continue;
                }
            }

            if self.config.uses(3) {
                let report = prune_unreachable(&mut board)?;
                changed = report.changed();
                record(&mut *stats, &mut waves, report);
                if changed {
                    continue;
                }
            }

            if self.config.uses(4) {
                let mut scope = stats.start_child_scope("path search");
                let report = spread_partial_certainties(&mut board, &self.config, &mut *scope)?;
                drop(scope);
                changed = report.changed();
                record(&mut *stats, &mut waves, report);
            }

            if !changed {
                break;
            }
        }

        let remaining_estimate = apply_overall_probabilities(&mut board);
        let mut last = stats.start_child_scope(&Wave::Finalization.to_string());
        last.record_value("min remaining water", remaining_estimate.min as f64);
        last.record_value("max remaining water", remaining_estimate.max as f64);
        drop(last);
        stats.record_value("wave passes", waves.len() as f64);

        Ok(finish(board, waves, remaining_estimate))
    }
}

fn record(sink: &mut dyn StatsSink, waves: &mut Vec<WaveReport>, report: WaveReport) {
    let mut scope = sink.start_child_scope(&report.wave.to_string());
    scope.record_value("ground found", report.ground_found as f64);
    scope.record_value("water found", report.water_found as f64);
    tracing::debug!(
        target: "rivulet::infer",
        wave = report.wave.number(),
        ground = report.ground_found,
        water = report.water_found,
        "infer.wave"
    );
    waves.push(report);
}

fn finish(
    board: Board<'_>,
    waves: Vec<WaveReport>,
    remaining_estimate: RemainingEstimate,
) -> InferenceOutcome {
    let certainty = board.grid;
    InferenceOutcome {
        probabilities: certainty.map(|c| c.probability().unwrap_or(0.0)),
        certainty,
        waves,
        remaining_estimate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario;
    use rivulet_core::{NoopSink, RecordingSink, TerrainType};
    use rivulet_grid::Position;
    use rivulet_test_utils::fixtures::MEANDER_16;

    fn engine(config: InferenceConfig) -> TerrainInference {
        TerrainInference::new(scenario::params(16, 16), config).unwrap()
    }

    #[test]
    fn rejects_invalid_config() {
        let config = InferenceConfig {
            waves_to_use: 0,
            ..Default::default()
        };
        assert!(TerrainInference::new(scenario::params(16, 16), config).is_err());
    }

    #[test]
    fn rejects_mismatched_observation() {
        let err = engine(InferenceConfig::default())
            .infer(scenario::unknown(9, 9), &mut NoopSink)
            .unwrap_err();
        assert!(matches!(
            err,
            InferenceError::SizeMismatch {
                expected: Size { width: 16, height: 16 },
                ..
            }
        ));
    }

    #[test]
    fn resolved_observation_runs_no_wave() {
        let truth = scenario::truth(MEANDER_16);
        let outcome = engine(InferenceConfig::default())
            .infer(crate::reveal_all(&truth), &mut NoopSink)
            .unwrap();
        assert!(outcome.waves.is_empty());
        for p in truth.positions() {
            assert_eq!(outcome.probabilities[p], truth[p].water_probability());
        }
    }

    #[test]
    fn single_gap_is_filled_by_local_deduction() {
        let truth = scenario::truth(MEANDER_16);
        let gap = Position::new(8, 6);
        let outcome = engine(InferenceConfig::default())
            .infer(scenario::observe_all_but(&truth, &[gap]), &mut NoopSink)
            .unwrap();
        assert_eq!(outcome.certainty[gap].terrain(), Some(TerrainType::Water));
        assert_eq!(outcome.resolved_counts(), (0, 1));
        assert_eq!(outcome.waves[0].wave, Wave::Edge);
    }

    #[test]
    fn limited_waves_stop_early() {
        let config = InferenceConfig {
            waves_to_use: 1,
            ..Default::default()
        };
        let outcome = engine(config)
            .infer(scenario::unknown(16, 16), &mut NoopSink)
            .unwrap();
        assert!(outcome.waves.iter().all(|r| r.wave == Wave::Edge));
        assert!(outcome.certainty[Position::new(0, 0)].is_ground());
    }

    #[test]
    fn records_each_wave_to_the_sink() {
        let mut sink = RecordingSink::new("test");
        let outcome = engine(InferenceConfig::default())
            .infer(scenario::unknown(16, 16), &mut sink)
            .unwrap();
        let root = sink.child("terrain inference").unwrap();
        assert_eq!(root.value("wave passes"), Some(outcome.waves.len() as f64));
        assert!(root.child("wave 1").is_some());
        assert!(root.child("final wave").is_some());
        let (ground, _) = outcome.resolved_counts();
        assert_eq!(root.total("ground found"), ground as f64);
    }
}
