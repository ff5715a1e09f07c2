//! Signal-timing and kinematics shared by the coarse and fine generators.
//!
//! Everything here is plain arithmetic on `f64` with the degenerate cases
//! (zero acceleration, zero elapsed time, negative distances) folded into
//! finite results, so no NaN or infinity reaches a `Node`.

use ead_core::{EadConfig, Node, TYPICAL_INTERSECTION_WIDTH_M};
use ead_signal::PhaseOracle;

/// Speed changes at or below this size ignore actuation lag, m/s.
pub const LAG_SPEED_THRESHOLD_MPS: f64 = 1.0;

/// Half an internal distance unit, m.
pub const HALF_DISTANCE_UNIT_M: f64 = 0.05;

/// Half an internal speed unit, m/s.
pub const HALF_SPEED_UNIT_MPS: f64 = 0.05;

/// First intersection whose stop bar lies at least `tolerance_m` downtrack of
/// `loc_m`, with the distance to it.
pub fn next_intersection<O>(oracle: &O, loc_m: f64, tolerance_m: f64) -> Option<(usize, f64)>
where
    O: PhaseOracle + ?Sized,
{
    (0..oracle.intersection_count()).find_map(|i| {
        let dist = oracle.stop_bar_m(i).ok()? - loc_m;
        (dist >= tolerance_m).then_some((i, dist))
    })
}

/// Speed and elapsed time on reaching a point `dist_m` ahead.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Arrival {
    pub speed_mps: f64,
    pub elapsed_s: f64,
}

/// Arrival at a point `dist_m` ahead when driving toward operating speed at
/// full acceleration, after the actuation lag, then cruising.
///
/// The lag is applied only when the speed change exceeds
/// [`LAG_SPEED_THRESHOLD_MPS`].  If operating speed is not reached in time,
/// the arrival speed comes from `v² = v0² + 2·a·d` over the distance left
/// after the lag.
///
/// A bar inside the lag distance is reached at constant current speed
/// (`dist / v0`) rather than after the full lag time.
pub fn kinematic_arrival(dist_m: f64, cur_speed_mps: f64, config: &EadConfig) -> Arrival {
    let dist = dist_m.max(0.0);
    let v0 = cur_speed_mps.max(0.0);
    let oper = config.operating_speed_mps;
    let a_max = config.max_accel_mps2;

    let delta_v = oper - v0;
    let accel = if delta_v >= 0.0 { a_max } else { -a_max };
    let time_to_oper = delta_v.abs() / a_max;
    let mut dist_to_oper = v0 * time_to_oper + 0.5 * accel * time_to_oper * time_to_oper;

    let (lag_t, lag_d) = if delta_v.abs() > LAG_SPEED_THRESHOLD_MPS {
        (config.lag_time_s, config.lag_time_s * v0)
    } else {
        (0.0, 0.0)
    };
    dist_to_oper += lag_d;

    let mut speed = oper;
    let mut elapsed = lag_t;

    if dist_to_oper > dist {
        if dist <= lag_d && v0 > 0.0 {
            // The bar arrives before the vehicle responds.
            speed = v0;
            elapsed = dist / v0;
        } else {
            let ramp = (dist - lag_d).max(0.0);
            let v_sq = v0 * v0 + 2.0 * accel * ramp;
            if v_sq <= 0.0 {
                speed = 0.0;
                elapsed += v0 / a_max;
            } else {
                speed = v_sq.sqrt();
                elapsed += (speed - v0) / accel;
            }
        }
    } else {
        elapsed += time_to_oper + (dist - dist_to_oper) / oper;
    }

    if !(elapsed.is_finite() && elapsed > 0.0) {
        elapsed = config.time_increment_s;
    }
    Arrival { speed_mps: speed.clamp(0.0, config.speed_limit_mps), elapsed_s: elapsed }
}

/// Speed at the end of a constant-acceleration chord covering `dist_m` in
/// `elapsed_s`: `2·d/t − v0`.  Returns `None` for a non-positive interval.
#[inline]
pub fn chord_speed(dist_m: f64, elapsed_s: f64, cur_speed_mps: f64) -> Option<f64> {
    if elapsed_s <= 0.0 {
        return None;
    }
    let v = 2.0 * dist_m / elapsed_s - cur_speed_mps;
    v.is_finite().then_some(v)
}

/// `(distance, time)` of the single hop beyond the last intersection.
///
/// Accelerates (or decelerates) to operating speed at the reduced terminal
/// acceleration; a hop shorter than [`TYPICAL_INTERSECTION_WIDTH_M`] is
/// stretched to that width at operating speed.
pub fn terminal_hop(cur_speed_mps: f64, config: &EadConfig) -> (f64, f64) {
    let v0 = cur_speed_mps.max(0.0);
    let oper = config.operating_speed_mps;
    let a = config.terminal_accel_mps2();
    let accel = if oper >= v0 { a } else { -a };

    let mut delta_t = (oper - v0).abs() / a;
    let mut delta_d = v0 * delta_t + 0.5 * accel * delta_t * delta_t;
    if delta_d < TYPICAL_INTERSECTION_WIDTH_M {
        delta_t += (TYPICAL_INTERSECTION_WIDTH_M - delta_d) / oper;
        delta_d = TYPICAL_INTERSECTION_WIDTH_M;
    }
    (delta_d, delta_t)
}

/// Seconds after the hop start at which the vehicle passes a point
/// `offset_m` ahead, under constant acceleration from `v0` to `v1` over
/// `step_s`.
pub fn crossing_time(offset_m: f64, v0: f64, v1: f64, step_s: f64) -> f64 {
    let s = offset_m.max(0.0);
    let a = (v1 - v0) / step_s;
    let tau = if a.abs() < 1e-9 {
        if v0 > 0.0 { s / v0 } else { step_s }
    } else {
        let disc = (v0 * v0 + 2.0 * a * s).max(0.0);
        (disc.sqrt() - v0) / a
    };
    if tau.is_finite() { tau.clamp(0.0, step_s) } else { step_s }
}

/// Collects candidate neighbors, dropping duplicates, infeasible states, and
/// anything past `cap`.
pub(crate) struct Candidates {
    from:        Node,
    speed_limit: f64,
    cap:         usize,
    nodes:       Vec<Node>,
}

impl Candidates {
    pub fn new(from: Node, config: &EadConfig) -> Self {
        Self {
            from,
            speed_limit: config.speed_limit_mps,
            cap:         config.max_neighbors,
            nodes:       Vec::new(),
        }
    }

    /// Returns `true` if the candidate was kept.
    pub fn push(&mut self, loc_m: f64, time_s: f64, speed_mps: f64) -> bool {
        if self.nodes.len() >= self.cap {
            return false;
        }
        if !(loc_m.is_finite() && time_s.is_finite() && speed_mps.is_finite()) {
            return false;
        }
        let node = Node::from_real(loc_m, time_s, speed_mps);
        if node.time() <= self.from.time()
            || node.speed() < 0
            || node.speed_mps() > self.speed_limit + HALF_SPEED_UNIT_MPS
            || self.nodes.contains(&node)
        {
            return false;
        }
        self.nodes.push(node);
        true
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.nodes.len() >= self.cap
    }

    pub fn into_vec(self) -> Vec<Node> {
        self.nodes
    }
}
