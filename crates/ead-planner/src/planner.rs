//! Two-pass trajectory planner.
//!
//! # Passes
//!
//! 1. **Coarse.**  [`CoarseNeighbors`] hops intersection to intersection
//!    until the vehicle is one intersection width past the last stop bar at
//!    operating speed.  A failure here is a planning failure.
//! 2. **Fine.**  [`FineNeighbors`] re-plans the first coarse hop in
//!    fixed time steps, ending just past the first coarse waypoint.
//! 3. **Re-plan.**  A second coarse search from the end of the fine path
//!    finishes the corridor.
//!
//! The returned path is the fine path followed by the re-planned coarse
//! path.  If the fine pass or the re-plan fails to find a path (or hits
//! `fine_max_expansions`), the plan falls back to the coarse path alone.
//!
//! Every call is independent: the planner owns only its configuration and
//! borrows the snapshot for the duration of [`EadPlanner::plan`].

use log::{debug, info, warn};

use ead_core::{EadConfig, Node, TYPICAL_INTERSECTION_WIDTH_M, VehicleState};
use ead_neighbors::timing::{HALF_DISTANCE_UNIT_M, HALF_SPEED_UNIT_MPS};
use ead_neighbors::{CoarseNeighbors, FineNeighbors};
use ead_search::{
    FuelProxyCost, RemainingDistanceHeuristic, SearchError, SearchPath, SearchStats, search_bounded,
};
use ead_signal::{IntersectionSnapshot, SnapshotOracle};

use crate::{PlanError, PlanResult};

// ── Plan ──────────────────────────────────────────────────────────────────────

/// Search counters for each pass of one planning call.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PlanStats {
    pub coarse: SearchStats,
    /// `None` when the fine pass was skipped.
    pub fine: Option<SearchStats>,
    pub replan: Option<SearchStats>,
}

#[derive(Clone, Debug)]
pub struct Plan {
    /// Waypoints of the coarse pass, one per intersection plus the terminal.
    pub coarse: Vec<Node>,
    /// Final path handed to the trajectory assembler.
    pub path: Vec<Node>,
    /// `true` if `path` starts with a fine-resolution segment.
    pub refined: bool,
    pub stats: PlanStats,
}

impl Plan {
    #[inline]
    pub fn goal(&self) -> Option<&Node> {
        self.path.last()
    }
}

// ── EadPlanner ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct EadPlanner {
    config: EadConfig,
    cost:   FuelProxyCost,
}

impl EadPlanner {
    /// Validates `config` up front so no bad parameter surfaces mid-search.
    pub fn new(config: EadConfig) -> PlanResult<Self> {
        config.validate()?;
        Ok(Self { config, cost: FuelProxyCost::default() })
    }

    /// Replace the edge cost used by both passes.
    pub fn with_cost(mut self, cost: FuelProxyCost) -> Self {
        self.cost = cost;
        self
    }

    pub fn config(&self) -> &EadConfig {
        &self.config
    }

    /// Plan from `current` through every intersection in `snapshot`.
    pub fn plan(&self, current: VehicleState, snapshot: &IntersectionSnapshot) -> PlanResult<Plan> {
        if !current.is_valid() {
            return Err(PlanError::InvalidState(format!("{current:?}")));
        }
        let start = current.to_node();
        let oracle = SnapshotOracle::new(snapshot).with_max_phase_steps(self.config.max_phase_steps);
        let goal_m = self.goal_distance_m(&start, snapshot);

        let coarse = self.coarse_pass(start, oracle, goal_m, self.config.max_expansions)?;
        debug!(
            "coarse pass: {} waypoints, cost {:.2}, expanded {}",
            coarse.nodes.len(),
            coarse.cost,
            coarse.stats.expanded
        );

        let mut stats = PlanStats { coarse: coarse.stats, ..PlanStats::default() };
        let (path, refined) = match self.refine(&coarse.nodes, oracle, goal_m, &mut stats)? {
            Some(path) => (path, true),
            None => (coarse.nodes.clone(), false),
        };

        if let Some(end) = path.last() {
            info!("planned {} states from {start} to {end} (refined: {refined})", path.len());
        }
        Ok(Plan { coarse: coarse.nodes, path, refined, stats })
    }

    /// Plan a batch of independent requests, in request order.
    #[cfg(not(feature = "parallel"))]
    pub fn plan_batch(&self, requests: &[(VehicleState, &IntersectionSnapshot)]) -> Vec<PlanResult<Plan>> {
        requests.iter().map(|&(state, snapshot)| self.plan(state, snapshot)).collect()
    }

    /// Plan a batch of independent requests, in request order.
    #[cfg(feature = "parallel")]
    pub fn plan_batch(&self, requests: &[(VehicleState, &IntersectionSnapshot)]) -> Vec<PlanResult<Plan>> {
        use rayon::prelude::*;

        requests.par_iter().map(|&(state, snapshot)| self.plan(state, snapshot)).collect()
    }

    /// One intersection width past the last stop bar still ahead of `start`,
    /// or past `start` itself when none is.
    fn goal_distance_m(&self, start: &Node, snapshot: &IntersectionSnapshot) -> f64 {
        let start_m = start.distance_m();
        let anchor = snapshot
            .last_stop_bar_m()
            .filter(|bar| bar - start_m >= self.config.stop_bar_tolerance_m)
            .unwrap_or(start_m);
        anchor + TYPICAL_INTERSECTION_WIDTH_M
    }

    fn coarse_pass(
        &self,
        start:          Node,
        oracle:         SnapshotOracle<'_>,
        goal_m:         f64,
        max_expansions: Option<usize>,
    ) -> PlanResult<SearchPath> {
        let oper = self.config.operating_speed_mps;
        let is_goal = |n: &Node| {
            n.distance_m() >= goal_m - HALF_DISTANCE_UNIT_M
                && (n.speed_mps() - oper).abs() <= HALF_SPEED_UNIT_MPS
        };
        let heuristic = RemainingDistanceHeuristic {
            goal_distance_m: goal_m,
            speed_limit_mps: self.config.speed_limit_mps,
        };
        let generator = CoarseNeighbors::new(self.config.clone(), oracle);
        Ok(search_bounded(start, is_goal, &generator, &self.cost, &heuristic, max_expansions)?)
    }

    /// Fine pass over the first coarse hop, then a coarse re-plan from its
    /// end.  `Ok(None)` means the coarse path should be used as is.
    fn refine(
        &self,
        coarse: &[Node],
        oracle: SnapshotOracle<'_>,
        goal_m: f64,
        stats:  &mut PlanStats,
    ) -> PlanResult<Option<Vec<Node>>> {
        let (Some(&start), Some(&first)) = (coarse.first(), coarse.get(1)) else {
            return Ok(None);
        };

        let heuristic = RemainingDistanceHeuristic {
            goal_distance_m: first.distance_m(),
            speed_limit_mps: self.config.speed_limit_mps,
        };
        let generator = FineNeighbors::new(self.config.clone(), oracle);
        let fine = match search_bounded(
            start,
            |n: &Node| n.distance() > first.distance(),
            &generator,
            &self.cost,
            &heuristic,
            Some(self.config.fine_max_expansions),
        ) {
            Ok(fine) => fine,
            Err(e) => return fallback("fine pass", e),
        };
        stats.fine = Some(fine.stats);

        let Some(&fine_end) = fine.nodes.last() else {
            return Ok(None);
        };
        let replan = match self.coarse_pass(fine_end, oracle, goal_m, self.config.max_expansions) {
            Ok(replan) => replan,
            Err(PlanError::NoPath { expanded }) => {
                warn!("re-plan from {fine_end} found no path after {expanded} expansions; using coarse path");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };
        stats.replan = Some(replan.stats);
        debug!(
            "fine pass: {} states to {fine_end}, re-plan: {} waypoints",
            fine.nodes.len(),
            replan.nodes.len()
        );

        let mut path = fine.nodes;
        path.extend(replan.nodes.into_iter().skip(1));
        Ok(Some(path))
    }
}

/// Exhaustion or the expansion cap in an optional pass is recoverable;
/// anything else is not.
fn fallback(pass: &str, e: SearchError) -> PlanResult<Option<Vec<Node>>> {
    match e {
        SearchError::NoPathFound { expanded } => {
            warn!("{pass} found no path after {expanded} expansions; using coarse path");
            Ok(None)
        }
        SearchError::ExpansionLimit(limit) => {
            warn!("{pass} hit the {limit}-expansion cap; using coarse path");
            Ok(None)
        }
        other => Err(other.into()),
    }
}
