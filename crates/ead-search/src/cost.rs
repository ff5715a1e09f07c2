//! Search extension points: successor generation, edge cost, heuristic.
//!
//! Closures implement [`CostModel`] and [`Heuristic`] directly, so ad-hoc
//! searches can pass `&|a: &Node, b: &Node| ...` without a wrapper type.

use ead_core::Node;

// ── NeighborGenerator ─────────────────────────────────────────────────────────

/// Produces the successor states reachable from a vertex in one hop.
///
/// Implementations must be deterministic: identical input yields identical
/// output in identical order.
pub trait NeighborGenerator {
    type Error: std::error::Error + Send + Sync + 'static;

    fn neighbors(&self, node: &Node) -> Result<Vec<Node>, Self::Error>;
}

// ── CostModel ─────────────────────────────────────────────────────────────────

/// Non-negative cost of the edge `from → to`.
pub trait CostModel {
    fn cost(&self, from: &Node, to: &Node) -> f64;
}

impl<F> CostModel for F
where
    F: Fn(&Node, &Node) -> f64,
{
    #[inline]
    fn cost(&self, from: &Node, to: &Node) -> f64 {
        self(from, to)
    }
}

/// Edge cost is the elapsed time, seconds.
#[derive(Copy, Clone, Debug, Default)]
pub struct TravelTimeCost;

impl CostModel for TravelTimeCost {
    #[inline]
    fn cost(&self, from: &Node, to: &Node) -> f64 {
        (to.time_s() - from.time_s()).max(0.0)
    }
}

/// Travel time plus penalties for speed changes and for stopping.
///
/// A cheap stand-in for fuel use: every m/s of speed change costs
/// `accel_weight` seconds-equivalent, and every transition from motion into
/// a standstill costs `stop_penalty`.
#[derive(Copy, Clone, Debug)]
pub struct FuelProxyCost {
    pub accel_weight: f64,
    pub stop_penalty: f64,
}

impl Default for FuelProxyCost {
    fn default() -> Self {
        Self { accel_weight: 0.1, stop_penalty: 10.0 }
    }
}

impl CostModel for FuelProxyCost {
    fn cost(&self, from: &Node, to: &Node) -> f64 {
        let dt = (to.time_s() - from.time_s()).max(0.0);
        let dv = (to.speed_mps() - from.speed_mps()).abs();
        let stop = if from.speed() > 0 && to.speed() == 0 { self.stop_penalty } else { 0.0 };
        dt + self.accel_weight * dv + stop
    }
}

// ── Heuristic ─────────────────────────────────────────────────────────────────

/// Lower-bound estimate of the cost remaining from a vertex to a goal.
pub trait Heuristic {
    fn estimate(&self, node: &Node) -> f64;
}

impl<F> Heuristic for F
where
    F: Fn(&Node) -> f64,
{
    #[inline]
    fn estimate(&self, node: &Node) -> f64 {
        self(node)
    }
}

/// Always zero: the driver degenerates to Dijkstra.
#[derive(Copy, Clone, Debug, Default)]
pub struct ZeroHeuristic;

impl Heuristic for ZeroHeuristic {
    #[inline]
    fn estimate(&self, _node: &Node) -> f64 {
        0.0
    }
}

/// Remaining distance to `goal_distance_m` covered at `speed_limit_mps`.
///
/// Never overestimates the travel-time component of [`TravelTimeCost`] or
/// [`FuelProxyCost`], so A* stays optimal with either.
#[derive(Copy, Clone, Debug)]
pub struct RemainingDistanceHeuristic {
    pub goal_distance_m: f64,
    pub speed_limit_mps: f64,
}

impl Heuristic for RemainingDistanceHeuristic {
    fn estimate(&self, node: &Node) -> f64 {
        if self.speed_limit_mps <= 0.0 {
            return 0.0;
        }
        (self.goal_distance_m - node.distance_m()).max(0.0) / self.speed_limit_mps
    }
}
