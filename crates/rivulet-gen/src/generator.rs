//! The river path generator.
//!
//! Generation runs `SelectEnds -> Extend* -> Terminate | Fail`:
//!
//! 1. Pick an entrance and an exit on the boundary ([`RiverEnds::select`]).
//! 2. Repeatedly extend the path from its tail. Candidates are the tail's
//!    in-grid orthogonal neighbours, filtered for thinness and for the
//!    near-edge band, then narrowed by a [`Strategy`].
//! 3. Stop when the tail reaches the exit or the target length is hit.
//!
//! Slack is the spare length the path can still spend on detours:
//! `(target - placed) - distance(tail, exit)`. Low slack pushes the walk
//! towards the exit; high slack allows wandering.

use crate::decision::{PathDecision, Strategy};
use crate::ends::RiverEnds;
use crate::error::{GenerationError, PathFailure};
use crate::path::{summarize_decisions, RiverPath};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rivulet_core::{ConfigError, RiverParameters, RiverSettings, StatsSink};
use rivulet_grid::{Grid, Position};
use smallvec::SmallVec;

/// Slack above which `Furthest` and `Center` reach full weight.
const SLACK_THRESHOLD: f64 = 3.0;

// ── RiverGenerator ─────────────────────────────────────────────────

/// Seeded generator of single-river maps for one grid size.
#[derive(Clone, Debug)]
pub struct RiverGenerator {
    settings: RiverSettings,
    params: RiverParameters,
}

impl RiverGenerator {
    /// Validate `settings` and derive parameters for a `width x height`
    /// grid.
    pub fn new(settings: RiverSettings, width: i32, height: i32) -> Result<Self, ConfigError> {
        let params = settings.derive(width, height)?;
        Ok(Self { settings, params })
    }

    /// Generator with [`RiverSettings::default`].
    pub fn with_defaults(width: i32, height: i32) -> Result<Self, ConfigError> {
        Self::new(RiverSettings::default(), width, height)
    }

    /// The settings this generator was built from.
    pub fn settings(&self) -> &RiverSettings {
        &self.settings
    }

    /// Derived cell counts for this grid size.
    pub fn parameters(&self) -> &RiverParameters {
        &self.params
    }

    /// Generate a river, retrying with `seed + 1`, `seed + 2`, ... until an
    /// attempt succeeds or `max_attempts` is reached.
    ///
    /// # Errors
    ///
    /// [`GenerationError::AttemptsExhausted`] when every attempt failed,
    /// [`GenerationError::Config`] when ends cannot be placed at all.
    pub fn generate(
        &self,
        seed: u64,
        sink: &mut dyn StatsSink,
    ) -> Result<RiverPath, GenerationError> {
        let mut stats = sink.start_child_scope("river generator");
        stats.record_value("seed", seed as f64);
        stats.record_value("min edge distance", self.params.min_edge_distance as f64);
        stats.record_value(
            "min endpoint separation",
            self.params.min_endpoint_separation as f64,
        );
        stats.record_value("target water cells", self.params.target_water_cells as f64);
        stats.record_value("min water cells", self.params.min_water_cells as f64);

        let attempts = self.settings.max_attempts.max(1);
        let mut attempt = 0;
        loop {
            let attempt_seed = seed.wrapping_add(attempt as u64);
            match self.attempt(attempt_seed, attempt, &mut *stats) {
                Ok(path) => {
                    stats.record_value("attempts", (attempt + 1) as f64);
                    stats.record_comment(&format!("river preview:\n{}", path.preview()));
                    tracing::debug!(
                        target: "rivulet::gen",
                        seed,
                        attempts = attempt + 1,
                        water_cells = path.len(),
                        "gen.done"
                    );
                    return Ok(path);
                }
                Err(GenerationError::PathFailure { reason, .. }) => {
                    attempt += 1;
                    if attempt >= attempts {
                        stats.record_value("attempts", attempts as f64);
                        return Err(GenerationError::AttemptsExhausted {
                            attempts,
                            last: reason,
                        });
                    }
                    tracing::warn!(
                        target: "rivulet::gen",
                        seed = attempt_seed,
                        attempt,
                        %reason,
                        "gen.retry"
                    );
                }
                Err(other) => return Err(other),
            }
        }
    }

    /// Draw a seed from `rng` and [`generate`](Self::generate) with it.
    ///
    /// `rng` is advanced by exactly one `u64` draw.
    pub fn generate_with_rng<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        sink: &mut dyn StatsSink,
    ) -> Result<RiverPath, GenerationError> {
        let seed = rng.random::<u64>();
        self.generate(seed, sink)
    }

    /// Run a single attempt with `seed`, without retrying.
    ///
    /// `attempt` is only used for labelling.
    pub fn attempt(
        &self,
        seed: u64,
        attempt: u32,
        sink: &mut dyn StatsSink,
    ) -> Result<RiverPath, GenerationError> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let ends = RiverEnds::select(&self.params, &mut rng)?;
        let target = self.params.adjusted_target(ends.distance());

        let mut stats = sink.start_child_scope(&format!("attempt {}", attempt + 1));
        stats.record_value("seed", seed as f64);
        stats.record_value("distance between ends", ends.distance() as f64);
        stats.record_comment(&format!("entrance: {}", ends.entrance));
        stats.record_comment(&format!("exit: {}", ends.exit));
        tracing::debug!(
            target: "rivulet::gen",
            seed,
            attempt,
            entrance = %ends.entrance,
            exit = %ends.exit,
            target,
            "gen.attempt"
        );

        let mut walk = Walk::new(self, rng, ends, target);
        let outcome = walk.run();
        stats.record_comment(&format!(
            "path decisions:\n{}",
            summarize_decisions(&walk.decisions)
        ));

        match outcome {
            Ok(()) => {
                stats.record_value("water cells", walk.path.len() as f64);
                Ok(RiverPath {
                    width: self.params.width,
                    height: self.params.height,
                    positions: walk.path,
                    decisions: walk.decisions,
                    entrance: ends.entrance,
                    exit: ends.exit,
                    target_water_cells: target,
                    attempt,
                    seed,
                })
            }
            Err(reason) => {
                stats.record_comment(&reason.to_string());
                Err(GenerationError::PathFailure { attempt, reason })
            }
        }
    }
}

// ── Walk ───────────────────────────────────────────────────────────

/// A neighbour of the tail under consideration.
#[derive(Clone, Copy, Debug)]
struct Candidate {
    position: Position,
    entrance_distance: i32,
    exit_distance: i32,
    edge_distance: i32,
    horizontal: bool,
}

type Candidates = SmallVec<[Candidate; 4]>;

/// State of one generation attempt.
struct Walk<'a> {
    settings: &'a RiverSettings,
    params: &'a RiverParameters,
    rng: ChaCha8Rng,
    ends: RiverEnds,
    target: i32,
    initial_slack: i32,
    /// Path index of every placed cell.
    placed: Grid<Option<usize>>,
    path: Vec<Position>,
    decisions: Vec<PathDecision>,
}

impl<'a> Walk<'a> {
    fn new(generator: &'a RiverGenerator, rng: ChaCha8Rng, ends: RiverEnds, target: i32) -> Self {
        let params = &generator.params;
        Self {
            settings: &generator.settings,
            params,
            rng,
            ends,
            target,
            initial_slack: target - 1 - ends.distance(),
            placed: Grid::new(params.width, params.height),
            path: Vec::with_capacity(target.max(1) as usize),
            decisions: Vec::with_capacity(target.max(1) as usize),
        }
    }

    fn tail(&self) -> Position {
        self.path.last().copied().unwrap_or(self.ends.entrance)
    }

    /// How many cells ago `position` was placed; the tail is 1.
    fn steps_back(&self, position: Position) -> Option<usize> {
        self.placed
            .get(position)
            .copied()
            .flatten()
            .map(|i| self.path.len() - i)
    }

    fn place(&mut self, decision: PathDecision) {
        let index = self.path.len();
        if let Some(slot) = self.placed.get_mut(decision.position) {
            *slot = Some(index);
        }
        self.path.push(decision.position);
        self.decisions.push(decision);
    }

    fn candidate(&self, position: Position) -> Candidate {
        Candidate {
            position,
            entrance_distance: position.distance_to(self.ends.entrance),
            exit_distance: position.distance_to(self.ends.exit),
            edge_distance: self.placed.edge_distance(position),
            horizontal: position.y == self.tail().y,
        }
    }

    fn run(&mut self) -> Result<(), PathFailure> {
        let entrance = self.ends.entrance;
        self.place(PathDecision {
            position: entrance,
            strategy: Strategy::Forced,
            candidate_count: 1,
            slack: self.initial_slack,
            horizontal: entrance.x == 0 || entrance.x == self.params.width - 1,
            comment: "entrance".into(),
        });

        while (self.path.len() as i32) < self.target {
            let tail = self.tail();
            if tail == self.ends.exit {
                break;
            }
            let candidates = self.filter_band(self.candidates());
            if candidates.is_empty() {
                return Err(PathFailure::Blocked {
                    tail,
                    placed: self.path.len(),
                });
            }

            let slack = (self.target - self.path.len() as i32) - tail.distance_to(self.ends.exit);
            let (strategy, comment) = self.choose_strategy(&candidates, slack);
            let chosen = self.break_long_lines(filter_by_strategy(&candidates, strategy));
            let pick = chosen[self.rng.random_range(0..chosen.len())];

            tracing::trace!(
                target: "rivulet::gen",
                x = pick.position.x,
                y = pick.position.y,
                strategy = ?strategy,
                candidates = candidates.len(),
                slack,
                "gen.place"
            );
            self.place(PathDecision {
                position: pick.position,
                strategy,
                candidate_count: candidates.len(),
                slack,
                horizontal: pick.horizontal,
                comment,
            });
        }

        let tail = self.tail();
        if tail != self.ends.exit {
            return Err(PathFailure::ExitNotReached {
                tail,
                placed: self.path.len(),
            });
        }
        if (self.path.len() as i32) < self.params.min_water_cells {
            return Err(PathFailure::TooShort {
                placed: self.path.len(),
                minimum: self.params.min_water_cells,
            });
        }
        Ok(())
    }

    /// Unvisited neighbours of the tail that do not touch the path more
    /// than two steps back.
    fn candidates(&self) -> Candidates {
        let Some(tail) = self.placed.get_cell(self.tail()) else {
            return Candidates::new();
        };
        tail.immediates()
            .iter()
            .filter(|c| c.value().is_none())
            .filter(|c| {
                !c.surrounding()
                    .iter()
                    .any(|s| self.steps_back(s.position()).is_some_and(|n| n > 2))
            })
            .map(|c| self.candidate(c.position()))
            .collect()
    }

    /// Keep the walk out of the near-edge band except right after the
    /// entrance and right before the exit.
    fn filter_band(&self, candidates: Candidates) -> Candidates {
        let band = self.params.min_edge_distance;
        if candidates.is_empty() {
            return candidates;
        }
        if candidates.iter().all(|c| c.entrance_distance < band) {
            keep_extreme(&candidates, |c| c.edge_distance, true)
        } else if candidates.iter().any(|c| c.exit_distance < band) {
            keep_extreme(&candidates, |c| c.exit_distance, false)
        } else {
            candidates
                .into_iter()
                .filter(|c| c.edge_distance >= band)
                .collect()
        }
    }

    fn choose_strategy(&mut self, candidates: &[Candidate], slack: i32) -> (Strategy, String) {
        let band = self.params.min_edge_distance;
        let tail = self.candidate(self.tail());
        if candidates.len() == 1 {
            return (Strategy::Forced, "single candidate".into());
        }
        if slack < 2 {
            return (Strategy::Closest, "slack exhausted".into());
        }
        if tail.exit_distance <= band + 1 {
            return (Strategy::Closest, "too close to the exit to turn".into());
        }
        if tail.edge_distance == band
            && tail.entrance_distance > band
            && candidates.iter().all(|c| c.edge_distance == tail.edge_distance)
        {
            return (
                Strategy::Closest,
                "facing the edge, turning towards the exit".into(),
            );
        }
        self.weighted_strategy(slack)
    }

    fn strategy_weights(&self, slack: i32) -> SmallVec<[(Strategy, f64); 4]> {
        let slack = slack as f64;
        let closest = if self.initial_slack > 0 {
            clamp01(1.0 - slack / self.initial_slack as f64)
        } else {
            1.0
        };
        let furthest = clamp01(slack - SLACK_THRESHOLD);

        let (w, h) = (self.params.width, self.params.height);
        let best_edge = ((w.min(h) as f64) / 2.0).ceil() - 1.0;
        let mid = self.target as f64 / 2.0 - 5.0;
        let placed = self.path.len() as f64;
        let to_mid = if mid > 0.0 {
            clamp01(1.0 - (placed - mid).abs() / mid)
        } else {
            0.0
        };
        let tail_edge = self.placed.edge_distance(self.tail()) as f64;
        let to_edge = if best_edge > 0.0 {
            clamp01(1.0 - tail_edge / best_edge)
        } else {
            0.0
        };
        let center = to_mid * to_edge * clamp01(slack / SLACK_THRESHOLD);

        let mut weights: SmallVec<[(Strategy, f64); 4]> = SmallVec::new();
        weights.push((Strategy::Closest, closest * self.settings.closest_modifier));
        weights.push((Strategy::Furthest, furthest * self.settings.furthest_modifier));
        weights.push((Strategy::Center, center * self.settings.center_modifier));
        let sum: f64 = weights.iter().map(|(_, w)| w).sum();
        if sum < 1.0 {
            weights.push((Strategy::Any, 1.0 - sum));
        }
        weights
    }

    fn weighted_strategy(&mut self, slack: i32) -> (Strategy, String) {
        let weights = self.strategy_weights(slack);
        let total: f64 = weights.iter().map(|(_, w)| w).sum();
        let comment = weights
            .iter()
            .map(|(s, w)| format!("{s:?} {:.0}%", 100.0 * w / total))
            .collect::<Vec<_>>()
            .join(" / ");

        let mut roll = self.rng.random::<f64>() * total;
        for (strategy, weight) in &weights {
            roll -= weight;
            if roll <= 0.0 && *weight > 0.0 {
                return (*strategy, comment);
            }
        }
        let fallback = weights
            .iter()
            .rev()
            .find(|(_, w)| *w > 0.0)
            .map_or(Strategy::Any, |(s, _)| *s);
        (fallback, comment)
    }

    /// After three moves along one axis, prefer turning when possible.
    fn break_long_lines(&self, candidates: Candidates) -> Candidates {
        let recent: SmallVec<[bool; 3]> = self
            .decisions
            .iter()
            .rev()
            .take(3)
            .map(|d| d.horizontal)
            .collect();
        let Some(&axis) = recent.first() else {
            return candidates;
        };
        let straight = recent.iter().all(|h| *h == axis);
        let mixed = candidates.iter().any(|c| c.horizontal) && candidates.iter().any(|c| !c.horizontal);
        if straight && mixed {
            candidates
                .into_iter()
                .filter(|c| c.horizontal != axis)
                .collect()
        } else {
            candidates
        }
    }
}

fn clamp01(v: f64) -> f64 {
    v.clamp(0.0, 1.0)
}

/// Candidates sharing the largest (`max`) or smallest key.
fn keep_extreme(candidates: &[Candidate], key: impl Fn(&Candidate) -> i32, max: bool) -> Candidates {
    let best = if max {
        candidates.iter().map(&key).max()
    } else {
        candidates.iter().map(&key).min()
    };
    candidates
        .iter()
        .filter(|c| Some(key(*c)) == best)
        .copied()
        .collect()
}

fn filter_by_strategy(candidates: &[Candidate], strategy: Strategy) -> Candidates {
    match strategy {
        Strategy::Closest => filter_by_strategy(
            &keep_extreme(candidates, |c| c.exit_distance, false),
            Strategy::Center,
        ),
        Strategy::Furthest => filter_by_strategy(
            &keep_extreme(candidates, |c| c.exit_distance, true),
            Strategy::Center,
        ),
        Strategy::Center => keep_extreme(candidates, |c| c.edge_distance, true),
        Strategy::Forced | Strategy::Any => candidates.iter().copied().collect(),
    }
}
