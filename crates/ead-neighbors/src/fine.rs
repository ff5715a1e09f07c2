//! Fine-resolution neighbor generator: fixed time-step hops.
//!
//! Each expansion advances time by `fine_time_step_s` and samples end speeds
//! around the current one.  A hop is kept only if every stop bar it reaches
//! is crossed during green.  The one exception is a hop that comes to rest
//! on the bar, so a vehicle can creep up to a red light and hold there.

use log::debug;

use ead_core::{EadConfig, Node};
use ead_search::NeighborGenerator;
use ead_signal::{PhaseOracle, SignalError, SignalPhase, SignalResult};

use crate::timing::{Candidates, HALF_DISTANCE_UNIT_M, crossing_time, next_intersection};

/// Time-stepped successor generator for the short-horizon pass.
#[derive(Clone, Debug)]
pub struct FineNeighbors<O> {
    config: EadConfig,
    oracle: O,
}

impl<O: PhaseOracle> FineNeighbors<O> {
    pub fn new(config: EadConfig, oracle: O) -> Self {
        Self { config, oracle }
    }

    pub fn config(&self) -> &EadConfig {
        &self.config
    }

    /// End speeds to try, in generation order, already clamped to
    /// `[0, speed_limit]`.
    fn end_speeds(&self, v0: f64) -> Vec<f64> {
        let cfg = &self.config;
        let step_s = cfg.fine_time_step_s;
        let dv_max = cfg.max_accel_mps2 * step_s;
        let k = cfg.fine_speed_steps as i64;

        let mut speeds: Vec<f64> = (-k..=k)
            .map(|i| i as f64 * cfg.fine_speed_step_mps)
            .filter(|dv| dv.abs() <= dv_max + 1e-9)
            .map(|dv| v0 + dv)
            .collect();
        // Hardest braking the vehicle can manage in one step.
        speeds.push(v0 - dv_max);
        if (cfg.operating_speed_mps - v0).abs() <= dv_max {
            speeds.push(cfg.operating_speed_mps);
        }

        speeds.into_iter().map(|v| v.clamp(0.0, cfg.speed_limit_mps)).collect()
    }

    /// `true` if the hop `from -> to` passes every stop bar it reaches on
    /// green.
    ///
    /// A bar within half a distance unit of either end counts as reached.
    /// Leaving a bar the vehicle sits on is checked at the departure time;
    /// holding position or stopping on a bar is always allowed.
    fn hop_clear(&self, from: &Node, to: &Node) -> SignalResult<bool> {
        if to.distance() == from.distance() {
            return Ok(true);
        }
        let d0 = from.distance_m();
        let d1 = to.distance_m();
        let duration = to.time_s() - from.time_s();
        for index in 0..self.oracle.intersection_count() {
            let bar = self.oracle.stop_bar_m(index)?;
            if bar < d0 - HALF_DISTANCE_UNIT_M || bar > d1 + HALF_DISTANCE_UNIT_M {
                continue;
            }
            if to.speed() == 0 && (bar - d1).abs() <= HALF_DISTANCE_UNIT_M {
                continue;
            }
            let tau = crossing_time(bar - d0, from.speed_mps(), to.speed_mps(), duration);
            let state = self.oracle.phase_at(index, from.time_s() + tau)?;
            if state.phase != SignalPhase::Green {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Used only when every sampled hop is blocked: brake to a stop at the
    /// nearest bar ahead, or on the bar the vehicle already sits on.
    fn safe_stop(&self, from: &Node, out: &mut Candidates) {
        let step_s = self.config.fine_time_step_s;
        let d0 = from.distance_m();
        let v0 = from.speed_mps();
        let dist = next_intersection(&self.oracle, d0, -HALF_DISTANCE_UNIT_M)
            .map_or(0.0, |(_, dist)| dist.max(0.0));
        let brake_s = if v0 > 0.0 { 2.0 * dist / v0 } else { 0.0 };
        out.push(d0 + dist, from.time_s() + brake_s.max(step_s), 0.0);
    }
}

impl<O: PhaseOracle> NeighborGenerator for FineNeighbors<O> {
    type Error = SignalError;

    fn neighbors(&self, node: &Node) -> Result<Vec<Node>, SignalError> {
        let step_s = self.config.fine_time_step_s;
        let d0 = node.distance_m();
        let v0 = node.speed_mps();
        let t1 = node.time_s() + step_s;
        let mut out = Candidates::new(*node, &self.config);

        for v1 in self.end_speeds(v0) {
            if out.is_full() {
                break;
            }
            let d1 = d0 + 0.5 * (v0 + v1) * step_s;
            let to = Node::from_real(d1, t1, v1);
            if self.hop_clear(node, &to)? {
                out.push(d1, t1, v1);
            }
        }

        if out.is_empty() {
            self.safe_stop(node, &mut out);
            debug!("fine expansion of {node}: every hop blocked, stopping at the bar");
        }
        Ok(out.into_vec())
    }
}
