//! Best-first search driver.
//!
//! # Algorithm
//!
//! Standard A* with lazy deletion:
//!
//! - `best[n]` holds the cheapest known cost-so-far and predecessor of `n`.
//! - The open heap orders entries by `g + h`; a cheaper revisit overwrites
//!   `best[n]` and pushes a fresh entry, and the superseded entry is skipped
//!   when popped.
//! - A popped vertex joins the closed set and is never expanded again.
//! - The goal test runs when a vertex is dequeued, not when it is generated.
//!
//! All maps are keyed by [`Node`], whose equality and hash use only the
//! quantized integer fields, so equivalent states reached along different
//! paths collapse into one vertex.
//!
//! # Determinism
//!
//! Heap ties on `g + h` are broken by `Node`'s total order (earliest time,
//! then lowest speed, then shortest distance).  Hash-map iteration order is
//! never consulted.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::{debug, warn};
use rustc_hash::{FxHashMap, FxHashSet};

use ead_core::Node;

use crate::{CostModel, Heuristic, NeighborGenerator, SearchError, SearchResult};

// ── Results ───────────────────────────────────────────────────────────────────

/// Counters describing one search run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Vertices moved to the closed set.
    pub expanded: usize,
    /// Successor states returned by the neighbor generator.
    pub generated: usize,
    /// Largest open-heap size observed.
    pub max_open: usize,
}

/// A goal-reaching path from the start vertex.
#[derive(Clone, Debug)]
pub struct SearchPath {
    /// States in travel order; `nodes[0]` is the start.
    pub nodes: Vec<Node>,
    /// Accumulated edge cost along `nodes`.
    pub cost: f64,
    pub stats: SearchStats,
}

impl SearchPath {
    #[inline]
    pub fn goal(&self) -> Option<&Node> {
        self.nodes.last()
    }
}

// ── Internals ─────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug)]
struct Record {
    g:      f64,
    parent: Option<Node>,
}

#[derive(Copy, Clone, Debug)]
struct OpenEntry {
    f:    f64,
    g:    f64,
    node: Node,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl Ord for OpenEntry {
    /// Reversed so that `BinaryHeap` (a max-heap) pops the lowest `f`, and on
    /// ties the lowest `Node`.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Find a least-cost path from `start` to any vertex satisfying `is_goal`.
///
/// Returns [`SearchError::NoPathFound`] if the reachable graph is exhausted.
pub fn search<G, N, C, H>(
    start:     Node,
    is_goal:   G,
    neighbors: &N,
    cost:      &C,
    heuristic: &H,
) -> SearchResult<SearchPath>
where
    G: Fn(&Node) -> bool,
    N: NeighborGenerator,
    C: CostModel,
    H: Heuristic,
{
    search_bounded(start, is_goal, neighbors, cost, heuristic, None)
}

/// [`search`] with an optional cap on the number of expansions.
///
/// When `max_expansions` is reached before a goal is dequeued the search
/// stops with [`SearchError::ExpansionLimit`].
pub fn search_bounded<G, N, C, H>(
    start:          Node,
    is_goal:        G,
    neighbors:      &N,
    cost:           &C,
    heuristic:      &H,
    max_expansions: Option<usize>,
) -> SearchResult<SearchPath>
where
    G: Fn(&Node) -> bool,
    N: NeighborGenerator,
    C: CostModel,
    H: Heuristic,
{
    let mut stats = SearchStats::default();
    let mut best: FxHashMap<Node, Record> = FxHashMap::default();
    let mut closed: FxHashSet<Node> = FxHashSet::default();
    let mut open: BinaryHeap<OpenEntry> = BinaryHeap::new();

    best.insert(start, Record { g: 0.0, parent: None });
    open.push(OpenEntry { f: heuristic.estimate(&start), g: 0.0, node: start });
    stats.max_open = 1;

    while let Some(OpenEntry { g, node, .. }) = open.pop() {
        if closed.contains(&node) {
            continue;
        }
        // Skip entries superseded by a cheaper revisit.
        if best.get(&node).is_some_and(|r| g > r.g) {
            continue;
        }

        if is_goal(&node) {
            debug!(
                "search reached goal {node} (cost {g:.2}, expanded {}, generated {})",
                stats.expanded, stats.generated
            );
            return Ok(SearchPath { nodes: reconstruct(&best, node), cost: g, stats });
        }

        if let Some(limit) = max_expansions {
            if stats.expanded >= limit {
                return Err(SearchError::ExpansionLimit(limit));
            }
        }

        closed.insert(node);
        stats.expanded += 1;

        let successors = neighbors
            .neighbors(&node)
            .map_err(|e| SearchError::Expansion(Box::new(e)))?;

        for next in successors {
            stats.generated += 1;
            if closed.contains(&next) {
                continue;
            }

            let step = cost.cost(&node, &next);
            if !step.is_finite() {
                warn!("dropping edge {node} -> {next}: non-finite cost {step}");
                continue;
            }
            let next_g = g + step.max(0.0);

            if best.get(&next).is_some_and(|r| r.g <= next_g) {
                continue;
            }
            best.insert(next, Record { g: next_g, parent: Some(node) });
            open.push(OpenEntry {
                f:    next_g + heuristic.estimate(&next),
                g:    next_g,
                node: next,
            });
        }
        stats.max_open = stats.max_open.max(open.len());
    }

    Err(SearchError::NoPathFound { expanded: stats.expanded })
}

fn reconstruct(best: &FxHashMap<Node, Record>, goal: Node) -> Vec<Node> {
    let mut nodes = vec![goal];
    let mut cur = goal;
    while let Some(parent) = best.get(&cur).and_then(|r| r.parent) {
        nodes.push(parent);
        cur = parent;
    }
    nodes.reverse();
    nodes
}
