//! Wave 4: probabilistic path enumeration.
//!
//! From every dangling water cell, candidate continuations of the river
//! are grown one cell per round as a tree. A path is valid once it reaches
//! another dangling water cell or the boundary, and invalid when it runs
//! out of budget, out of exits or out of legal moves. Each tree starts
//! with a certainty of `1 / missing` at its root, split evenly between the
//! live children of every branch point; pruned branches hand their share
//! back to their siblings.
//!
//! Valid paths then vote for their cells. Per tree, a cell's vote is the
//! summed certainty of the valid paths through it divided by the root's
//! missing count, so a single tree votes at most `1 / missing²`: 1 for a
//! root missing one neighbour, 0.25 for a root missing two. Votes from
//! different trees combine by maximum.
//!
//! A path may not end on the known water already joined to its root, and
//! never uses more new cells than the remaining water estimate allows.

use crate::board::Board;
use crate::config::InferenceConfig;
use crate::connectivity::dangling_endpoints;
use crate::error::InferenceError;
use crate::estimate::remaining_water;
use crate::wave::{Wave, WaveReport};
use indexmap::{IndexMap, IndexSet};
use rivulet_core::{StatsSink, TerrainType};
use rivulet_grid::Position;
use smallvec::SmallVec;

// ── Arena ──────────────────────────────────────────────────────────

/// Index of a [`PathNode`] in its [`PathTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct PathId(usize);

/// Outcome of a candidate path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Validity {
    /// Still growing, or a branch point.
    Unknown,
    Valid,
    Invalid,
}

/// One candidate continuation of the river.
#[derive(Clone, Debug)]
pub(crate) struct PathNode {
    /// Cells from the root endpoint to the tail.
    pub(crate) cells: Vec<Position>,
    pub(crate) certainty: f64,
    pub(crate) validity: Validity,
    /// Boundary exits this path turned away from.
    pub(crate) skipped_exits: IndexSet<Position>,
    /// Where the path settled, if it did.
    pub(crate) end: Option<Position>,
    parent: Option<PathId>,
    children: Vec<PathId>,
}

impl PathNode {
    fn tail(&self) -> Position {
        self.cells[self.cells.len() - 1]
    }
}

/// Every candidate path grown from one endpoint.
#[derive(Clone, Debug)]
pub(crate) struct PathTree {
    nodes: Vec<PathNode>,
    /// Paths still growing, in the order they are stepped.
    live: Vec<PathId>,
    valid: Vec<PathId>,
    invalid: usize,
    /// Water immediates the root endpoint lacks.
    pub(crate) missing: i32,
    /// Growth stopped on the step budget with paths still live.
    pub(crate) truncated: bool,
}

impl PathTree {
    pub(crate) fn new(start: Position, missing: i32) -> Self {
        let root = PathNode {
            cells: vec![start],
            certainty: 1.0 / missing.max(1) as f64,
            validity: Validity::Unknown,
            skipped_exits: IndexSet::new(),
            end: None,
            parent: None,
            children: Vec::new(),
        };
        Self {
            nodes: vec![root],
            live: vec![PathId(0)],
            valid: Vec::new(),
            invalid: 0,
            missing,
            truncated: false,
        }
    }

    pub(crate) fn node(&self, id: PathId) -> &PathNode {
        &self.nodes[id.0]
    }

    pub(crate) fn live(&self) -> &[PathId] {
        &self.live
    }

    pub(crate) fn valid_count(&self) -> usize {
        self.valid.len()
    }

    pub(crate) fn invalid_count(&self) -> usize {
        self.invalid
    }

    fn unlist(&mut self, id: PathId) {
        self.live.retain(|&l| l != id);
    }

    /// Grow a live path by one cell.
    pub(crate) fn extend(&mut self, id: PathId, next: Position) {
        self.nodes[id.0].cells.push(next);
    }

    /// Fork `parent` into one child per continuation, splitting its
    /// certainty evenly. The children replace the parent in the live list.
    pub(crate) fn branch(&mut self, parent: PathId, forks: &[(Position, SmallVec<[Position; 4]>)]) {
        self.unlist(parent);
        for (next, skipped) in forks {
            let id = PathId(self.nodes.len());
            let from = &self.nodes[parent.0];
            let mut cells = from.cells.clone();
            cells.push(*next);
            let mut skipped_exits = from.skipped_exits.clone();
            skipped_exits.extend(skipped.iter().copied());
            self.nodes.push(PathNode {
                cells,
                certainty: 0.0,
                validity: Validity::Unknown,
                skipped_exits,
                end: None,
                parent: Some(parent),
                children: Vec::new(),
            });
            self.nodes[parent.0].children.push(id);
            self.live.push(id);
        }
        self.refresh(parent, None);
    }

    /// Hand `id`'s certainty (optionally replaced first) down to its
    /// children that are not invalid, recursively.
    fn refresh(&mut self, id: PathId, certainty: Option<f64>) {
        let mut stack = vec![(id, certainty)];
        while let Some((id, certainty)) = stack.pop() {
            if let Some(c) = certainty {
                self.nodes[id.0].certainty = c;
            }
            let node = &self.nodes[id.0];
            let children: SmallVec<[PathId; 4]> = node
                .children
                .iter()
                .copied()
                .filter(|c| self.nodes[c.0].validity != Validity::Invalid)
                .collect();
            if children.is_empty() {
                continue;
            }
            let share = node.certainty / children.len() as f64;
            stack.extend(children.into_iter().map(|c| (c, Some(share))));
        }
    }

    pub(crate) fn validate(&mut self, id: PathId, end: Option<Position>) {
        self.unlist(id);
        let node = &mut self.nodes[id.0];
        node.validity = Validity::Valid;
        node.end = end;
        self.valid.push(id);
    }

    /// Invalidate `id`. A parent left without any child that is not
    /// invalid is invalidated in turn; otherwise its certainty is
    /// redistributed among the survivors.
    pub(crate) fn invalidate(&mut self, id: PathId) {
        let mut current = id;
        loop {
            self.unlist(current);
            self.invalid += 1;
            let node = &mut self.nodes[current.0];
            node.validity = Validity::Invalid;
            node.end = node.cells.last().copied();
            let Some(parent) = node.parent else {
                return;
            };
            let survivors = self.nodes[parent.0]
                .children
                .iter()
                .any(|c| self.nodes[c.0].validity != Validity::Invalid);
            if survivors {
                self.refresh(parent, None);
                return;
            }
            current = parent;
        }
    }

    /// Valid paths in the order they settled.
    pub(crate) fn valid_paths(&self) -> impl Iterator<Item = &PathNode> {
        self.valid
            .iter()
            .map(|&id| &self.nodes[id.0])
            .filter(|n| n.validity == Validity::Valid)
    }

    /// Summed certainty of valid paths per cell, root excluded, in first
    /// visit order.
    pub(crate) fn cell_totals(&self) -> IndexMap<Position, f64> {
        let mut totals = IndexMap::new();
        for node in self.valid_paths() {
            for &p in &node.cells[1..] {
                *totals.entry(p).or_insert(0.0) += node.certainty;
            }
        }
        totals
    }
}

// ── Search ─────────────────────────────────────────────────────────

/// A dangling water cell a tree grows from.
struct Root {
    position: Position,
    missing: i32,
    /// Known water already joined to the root. A path may not end on it.
    segment: IndexSet<Position>,
}

impl Root {
    fn new(board: &Board<'_>, position: Position, missing: i32) -> Self {
        let mut segment = IndexSet::from([position]);
        let mut next = 0;
        while let Some(&p) = segment.get_index(next) {
            next += 1;
            for n in board.immediates(p) {
                if board.is_water(n) {
                    segment.insert(n);
                }
            }
        }
        Self {
            position,
            missing,
            segment,
        }
    }
}

/// Fixed context of one wave 4 pass.
struct Search<'b, 'p> {
    board: &'b Board<'p>,
    /// Dangling water cells a path may end on.
    targets: IndexSet<Position>,
    /// Unknown boundary cells.
    exits: Vec<Position>,
    remaining: i32,
    threshold: f64,
    /// Steps one tree may take before it is abandoned.
    budget: usize,
}

impl Search<'_, '_> {
    /// Every live path either grows or settles each round, and none grows
    /// past `remaining` new cells, so the loop ends on its own.
    fn grow(&self, root: &Root) -> (PathTree, i32) {
        let mut tree = PathTree::new(root.position, root.missing);
        let mut steps = 0;
        let mut rounds = 0;
        while !tree.live().is_empty() {
            for id in tree.live().to_vec() {
                if steps == self.budget {
                    tree.truncated = true;
                    return (tree, rounds);
                }
                self.step(&mut tree, id, &root.segment);
                steps += 1;
            }
            rounds += 1;
        }
        (tree, rounds)
    }

    /// Skipping nearby exits is a heuristic; an exhaustive search only
    /// prunes on hard constraints.
    fn prunes_skipped_exits(&self) -> bool {
        self.threshold > 0.0 && !self.exits.is_empty()
    }

    fn step(&self, tree: &mut PathTree, id: PathId, segment: &IndexSet<Position>) {
        let node = tree.node(id);
        let tail = node.tail();
        let len = node.cells.len() as i32;

        // The root is already water; only the cells after it use up water.
        if len - 1 > self.remaining {
            return tree.invalidate(id);
        }
        if self.prunes_skipped_exits() && node.skipped_exits.len() == self.exits.len() {
            return tree.invalidate(id);
        }
        if node.certainty < self.threshold {
            return tree.validate(id, None);
        }
        if self.board.is_on_edge(tail) && len > 1 {
            return tree.validate(id, Some(tail));
        }

        let next = self.continuations(node, segment);
        if next.is_empty() {
            return tree.invalidate(id);
        }
        if let Some(&end) = next
            .iter()
            .find(|&&n| !self.board.is_on_edge(n) && self.targets.contains(&n))
        {
            return tree.validate(id, Some(end));
        }

        if let [only] = next.as_slice() {
            tree.extend(id, *only);
            return;
        }
        let reach = self.board.band() + 1;
        let close: SmallVec<[(Position, i32); 8]> = self
            .exits
            .iter()
            .map(|&e| (e, e.distance_to(tail)))
            .filter(|&(_, d)| d <= reach)
            .collect();
        let forks: SmallVec<[(Position, SmallVec<[Position; 4]>); 4]> = next
            .iter()
            .map(|&n| {
                let skipped = close
                    .iter()
                    .filter(|&&(e, d)| e.distance_to(n) > d)
                    .map(|&(e, _)| e)
                    .collect();
                (n, skipped)
            })
            .collect();
        tree.branch(id, &forks);
    }

    /// Legal next cells: unvisited, unknown or a dangling water cell outside
    /// the root's own segment, not sideways inside the band, and not
    /// touching the path before its last two cells.
    fn continuations(
        &self,
        node: &PathNode,
        segment: &IndexSet<Position>,
    ) -> SmallVec<[Position; 4]> {
        let board = self.board;
        let tail = node.tail();
        let tail_distance = board.edge_distance(tail);
        let settled = &node.cells[..node.cells.len().saturating_sub(2)];
        board
            .immediates(tail)
            .into_iter()
            .filter(|n| !node.cells.contains(n) && !segment.contains(n))
            .filter(|n| !board.is_obvious(*n) || self.targets.contains(n))
            .filter(|&n| tail_distance >= board.band() || board.edge_distance(n) != tail_distance)
            .filter(|&n| !board.surrounding(n).iter().any(|s| settled.contains(s)))
            .collect()
    }
}

/// Run one pass of wave 4.
///
/// Only resolves cells when the search is exhaustive and conclusive: every
/// dangling water cell grew a finished tree with at least one valid path.
/// Otherwise the pass leaves estimates behind and reports no change.
pub(crate) fn spread_partial_certainties(
    board: &mut Board<'_>,
    config: &InferenceConfig,
    sink: &mut dyn StatsSink,
) -> Result<WaveReport, InferenceError> {
    let mut report = WaveReport::new(Wave::Paths);
    let threshold = config.path_certainty_threshold;
    sink.record_value("path certainty threshold", threshold);

    for cell in board.grid.iter_mut() {
        cell.reset();
    }

    let remaining = remaining_water(board).max;
    let roots: Vec<Root> = dangling_endpoints(board)
        .into_iter()
        .filter(|e| e.water)
        .map(|e| Root::new(board, e.position, e.missing))
        .collect();

    let exits: Vec<Position> = board
        .edge_positions()
        .into_iter()
        .filter(|&p| !board.is_obvious(p))
        .collect();
    let search = Search {
        board: &*board,
        targets: roots.iter().map(|r| r.position).collect(),
        exits,
        remaining,
        threshold,
        budget: config.path_search_budget,
    };

    let mut trees = Vec::with_capacity(roots.len());
    for root in &roots {
        let (tree, rounds) = search.grow(root);
        let mut stats = sink.start_child_scope(&root.position.to_string());
        stats.record_value("maximum path distance", rounds as f64);
        stats.record_value("valid paths", tree.valid_count() as f64);
        stats.record_value("invalid paths", tree.invalid_count() as f64);
        let exits = tree
            .valid_paths()
            .filter(|n| n.end.is_some_and(|e| search.board.is_on_edge(e)))
            .count();
        stats.record_value("paths leaving the map", exits as f64);
        if tree.truncated {
            stats.record_value("search budget exhausted", 1.0);
            tracing::debug!(
                target: "rivulet::infer",
                root = %root.position,
                budget = config.path_search_budget,
                "infer.paths.truncated"
            );
        }
        trees.push(tree);
    }

    for tree in &trees {
        let missing = tree.missing.max(1) as f64;
        for (p, total) in tree.cell_totals() {
            if let Some(cell) = board.grid.get_mut(p) {
                cell.add_probability(total / missing);
            }
        }
    }

    if config.exhaustive() {
        let conclusive = !trees.is_empty()
            && remaining > 0
            && trees.iter().all(|t| !t.truncated && t.valid_count() > 0);
        if conclusive {
            for p in board.positions_where(|c| !c.has_probability()) {
                board.resolve(p, TerrainType::Ground, &mut report)?;
            }
        } else {
            sink.record_comment("exhaustive search inconclusive, nothing resolved");
        }
    }
    Ok(report)
}
