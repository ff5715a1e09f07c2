//! Intersection list handed to the planner for one search.

use serde::Deserialize;

use crate::{PhaseCycle, SignalError, SignalPhase, SignalResult};

/// One signalized intersection on the planned route.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Intersection {
    /// Identifier assigned by the V2I layer.  Informational only.
    pub id: u32,

    /// Downtrack location of the stop bar, m.
    pub stop_bar_m: f64,

    /// Phase active at plan time 0.
    pub phase: SignalPhase,

    /// Seconds left in `phase` at plan time 0.
    pub time_remaining_s: f64,

    /// Fixed-time phase durations.
    pub cycle: PhaseCycle,
}

/// Intersections sorted by increasing stop-bar distance.
///
/// Construct with [`IntersectionSnapshot::new`], which validates every entry
/// so that phase projection never sees zero-length or non-finite phases.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IntersectionSnapshot {
    intersections: Vec<Intersection>,
}

impl IntersectionSnapshot {
    /// Validate and sort `intersections` by stop-bar distance.
    pub fn new(mut intersections: Vec<Intersection>) -> SignalResult<Self> {
        for ix in &intersections {
            if !ix.stop_bar_m.is_finite() {
                return Err(SignalError::InvalidSnapshot(format!(
                    "intersection {} has non-finite stop bar location",
                    ix.id
                )));
            }
            if !(ix.time_remaining_s.is_finite() && ix.time_remaining_s >= 0.0) {
                return Err(SignalError::InvalidSnapshot(format!(
                    "intersection {} has invalid time remaining {}",
                    ix.id, ix.time_remaining_s
                )));
            }
            if !ix.cycle.is_valid() {
                return Err(SignalError::InvalidSnapshot(format!(
                    "intersection {} has non-positive phase durations {:?}",
                    ix.id, ix.cycle
                )));
            }
        }
        intersections.sort_by(|a, b| a.stop_bar_m.total_cmp(&b.stop_bar_m));
        Ok(Self { intersections })
    }

    /// A snapshot with no intersections (open road).
    pub fn empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.intersections.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.intersections.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Intersection> {
        self.intersections.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Intersection> + '_ {
        self.intersections.iter()
    }

    /// Stop bar of the farthest intersection, if any.
    pub fn last_stop_bar_m(&self) -> Option<f64> {
        self.intersections.last().map(|ix| ix.stop_bar_m)
    }
}
