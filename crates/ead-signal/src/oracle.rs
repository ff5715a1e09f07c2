//! Phase projection over a frozen intersection snapshot.
//!
//! # Pluggability
//!
//! Neighbor generators query signal timing through the [`PhaseOracle`] trait,
//! so a deployment can substitute an adaptive-timing predictor without
//! touching the search.  [`SnapshotOracle`] is the fixed-time implementation.
//!
//! # Time base
//!
//! All times are plan-relative seconds: `0.0` is the instant the snapshot
//! was captured, when intersection `i` was in `phase` with
//! `time_remaining_s` left.

use crate::{IntersectionSnapshot, SignalError, SignalPhase, SignalResult, SignalState};

/// Default bound on phase transitions walked in a single projection.
pub const DEFAULT_MAX_PHASE_STEPS: usize = 64;

// ── PhaseOracle trait ─────────────────────────────────────────────────────────

/// Signal timing queries used during neighbor generation.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so independent searches can share
/// one oracle across threads.
pub trait PhaseOracle: Send + Sync {
    /// Number of intersections in the snapshot.
    fn intersection_count(&self) -> usize;

    /// Downtrack stop-bar location of intersection `index`, m.
    fn stop_bar_m(&self, index: usize) -> SignalResult<f64>;

    /// Phase active at plan time `time_s` and the time left in it.
    fn phase_at(&self, index: usize, time_s: f64) -> SignalResult<SignalState>;

    /// Plan time at which the next red → green transition occurs after
    /// `after_s`.
    fn next_green_onset(&self, index: usize, after_s: f64) -> SignalResult<f64>;

    /// Configured duration of `phase` at intersection `index`, s.
    fn phase_duration(&self, index: usize, phase: SignalPhase) -> SignalResult<f64>;
}

// ── SnapshotOracle ────────────────────────────────────────────────────────────

/// Fixed-time projection over a borrowed [`IntersectionSnapshot`].
#[derive(Clone, Copy, Debug)]
pub struct SnapshotOracle<'a> {
    snapshot:        &'a IntersectionSnapshot,
    max_phase_steps: usize,
}

impl<'a> SnapshotOracle<'a> {
    pub fn new(snapshot: &'a IntersectionSnapshot) -> Self {
        Self { snapshot, max_phase_steps: DEFAULT_MAX_PHASE_STEPS }
    }

    /// Override the projection step bound.
    pub fn with_max_phase_steps(mut self, steps: usize) -> Self {
        self.max_phase_steps = steps;
        self
    }

    pub fn snapshot(&self) -> &'a IntersectionSnapshot {
        self.snapshot
    }
}

impl PhaseOracle for SnapshotOracle<'_> {
    fn intersection_count(&self) -> usize {
        self.snapshot.len()
    }

    fn stop_bar_m(&self, index: usize) -> SignalResult<f64> {
        self.snapshot
            .get(index)
            .map(|ix| ix.stop_bar_m)
            .ok_or(SignalError::UnknownIntersection(index))
    }

    fn phase_at(&self, index: usize, time_s: f64) -> SignalResult<SignalState> {
        let ix = self
            .snapshot
            .get(index)
            .ok_or(SignalError::UnknownIntersection(index))?;
        let cycle = &ix.cycle;

        // Unknown indication hands off to the next known phase immediately,
        // which then runs for its full duration.
        let (mut phase, mut end) = if ix.phase.is_known() {
            (ix.phase, ix.time_remaining_s)
        } else {
            let next = ix.phase.next();
            (next, cycle.duration(next))
        };

        if time_s < end {
            return Ok(SignalState { phase, time_remaining_s: end - time_s });
        }

        // Skip whole cycles; the phase at `end + k * cycle` is unchanged.
        let cycle_s = cycle.cycle_s();
        let whole = ((time_s - end) / cycle_s).floor();
        if whole >= 1.0 {
            end += whole * cycle_s;
        }

        let mut steps = 0;
        while time_s >= end {
            steps += 1;
            if steps > self.max_phase_steps {
                return Err(SignalError::PhaseStepLimit { index, steps: self.max_phase_steps });
            }
            phase = phase.next();
            end += cycle.duration(phase);
        }

        Ok(SignalState { phase, time_remaining_s: end - time_s })
    }

    fn next_green_onset(&self, index: usize, after_s: f64) -> SignalResult<f64> {
        let ix = self
            .snapshot
            .get(index)
            .ok_or(SignalError::UnknownIntersection(index))?;
        let state = self.phase_at(index, after_s)?;

        let mut phase = state.phase;
        let mut end = after_s + state.time_remaining_s;
        let mut steps = 0;

        // Walk forward until the end of a red phase, which is a green onset.
        while phase != SignalPhase::Red {
            steps += 1;
            if steps > self.max_phase_steps {
                return Err(SignalError::PhaseStepLimit { index, steps: self.max_phase_steps });
            }
            phase = phase.next();
            if !phase.is_known() {
                phase = phase.next();
            }
            end += ix.cycle.duration(phase);
        }

        Ok(end)
    }

    fn phase_duration(&self, index: usize, phase: SignalPhase) -> SignalResult<f64> {
        self.snapshot
            .get(index)
            .map(|ix| ix.cycle.duration(phase))
            .ok_or(SignalError::UnknownIntersection(index))
    }
}
