//! Coarse-resolution neighbor generator: one hop per intersection.
//!
//! # Expansion
//!
//! From `(loc, t0, v0)` the generator looks at the next stop bar downtrack
//! and emits states *at* that bar:
//!
//! 1. **Current green.**  If the kinematic arrival falls in a green phase, a
//!    fan of arrival times spaced `time_increment_s` apart, from the
//!    kinematic arrival up to the phase end minus `time_buffer_s`.  Each
//!    later arrival uses the chord speed `2·d/(t − t0) − v0`.
//! 2. **Next green.**  A second fan starting at the next green onset plus
//!    `time_buffer_s`, with the entry speed solved so the vehicle arrives
//!    exactly at the buffered onset after the actuation lag.
//! 3. **Stop and wait.**  If neither fan produced a candidate, a single
//!    zero-speed state at the bar, timed at the raw green onset.
//!
//! Past the last intersection the generator emits a single terminal state at
//! operating speed.
//!
//! Fans stop as soon as the speed drops below `crawling_speed_mps`.  Speeds
//! above the limit are skipped without ending the fan, since later (slower)
//! entries may still be legal.

use log::{debug, warn};

use ead_core::{EadConfig, Node};
use ead_search::NeighborGenerator;
use ead_signal::{PhaseOracle, SignalError, SignalPhase, SignalResult};

use crate::timing::{Candidates, chord_speed, kinematic_arrival, next_intersection, terminal_hop};

/// Intersection-to-intersection successor generator.
#[derive(Clone, Debug)]
pub struct CoarseNeighbors<O> {
    config: EadConfig,
    oracle: O,
}

impl<O: PhaseOracle> CoarseNeighbors<O> {
    pub fn new(config: EadConfig, oracle: O) -> Self {
        Self { config, oracle }
    }

    pub fn config(&self) -> &EadConfig {
        &self.config
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// The single hop past the last intersection.
    fn terminal(&self, from: &Node) -> Vec<Node> {
        let (delta_d, delta_t) = terminal_hop(from.speed_mps(), &self.config);
        vec![Node::from_real(
            from.distance_m() + delta_d,
            from.time_s() + delta_t,
            self.config.operating_speed_mps,
        )]
    }

    fn toward_intersection(&self, from: &Node, index: usize, dist_m: f64) -> SignalResult<Vec<Node>> {
        let cfg = &self.config;
        let t0 = from.time_s();
        let v0 = from.speed_mps();
        let loc = from.distance_m() + dist_m;
        let mut out = Candidates::new(*from, cfg);

        let arrival = kinematic_arrival(dist_m, v0, cfg);
        let arrive_t = t0 + arrival.elapsed_s;

        let state = self.oracle.phase_at(index, arrive_t)?;
        if state.phase == SignalPhase::Green {
            let expiration = arrive_t + state.time_remaining_s - cfg.time_buffer_s;
            self.fan(&mut out, loc, dist_m, (t0, v0), (arrive_t, arrival.speed_mps), expiration);
        }

        let raw_onset = self.oracle.next_green_onset(index, arrive_t)?;
        let green_s = self.oracle.phase_duration(index, SignalPhase::Green)?;
        let onset = raw_onset + cfg.time_buffer_s;
        let expiration = onset + green_s - cfg.time_buffer_s;

        let lag_d = cfg.lag_time_s * v0;
        let until_onset = onset - t0;
        // Within the lag distance, or too soon for the vehicle to respond:
        // this window is out of reach.
        if dist_m >= lag_d && until_onset > cfg.lag_time_s {
            let speed = (2.0 * (dist_m - lag_d) / (until_onset - cfg.lag_time_s) - v0)
                .clamp(0.0, cfg.speed_limit_mps);
            self.fan(&mut out, loc, dist_m, (t0, v0), (onset, speed), expiration);
        }

        if out.is_empty() {
            let wait_until = raw_onset.max(t0 + cfg.time_increment_s);
            out.push(loc, wait_until, 0.0);
            debug!("stop-and-wait at intersection {index} until {wait_until:.1} s");
        }

        Ok(out.into_vec())
    }

    /// Arrivals at `loc` from `first` onward, one `time_increment_s` apart.
    fn fan(
        &self,
        out: &mut Candidates,
        loc_m: f64,
        dist_m: f64,
        (t0, v0): (f64, f64),
        first: (f64, f64),
        expiration_s: f64,
    ) {
        let cfg = &self.config;
        let (mut t, mut v) = first;
        while v >= cfg.crawling_speed_mps && t <= expiration_s && !out.is_full() {
            if v <= cfg.speed_limit_mps {
                out.push(loc_m, t, v);
            }
            t += cfg.time_increment_s;
            match chord_speed(dist_m, t - t0, v0) {
                Some(next) => v = next,
                None => break,
            }
        }
    }
}

impl<O: PhaseOracle> NeighborGenerator for CoarseNeighbors<O> {
    type Error = SignalError;

    fn neighbors(&self, node: &Node) -> Result<Vec<Node>, SignalError> {
        let Some((index, dist)) =
            next_intersection(&self.oracle, node.distance_m(), self.config.stop_bar_tolerance_m)
        else {
            return Ok(self.terminal(node));
        };

        let out = match self.toward_intersection(node, index, dist) {
            Ok(out) => out,
            Err(SignalError::UnknownIntersection(i)) => {
                warn!("intersection {i} vanished from the snapshot; treating {node} as terminal");
                return Ok(self.terminal(node));
            }
            Err(e) => return Err(e),
        };

        debug!("coarse expansion of {node}: {} neighbors at intersection {index}", out.len());
        Ok(out)
    }
}
