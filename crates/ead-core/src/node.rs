//! Quantized search-graph vertex.
//!
//! # Design
//!
//! A `Node` is a vehicle state `(distance, time, speed)` stored as `i64`
//! counts of a fixed internal unit, one decimal order finer than the
//! real-world unit:
//!
//! | Field      | Internal unit |
//! |------------|---------------|
//! | `distance` | 0.1 m         |
//! | `time`     | 0.1 s         |
//! | `speed`    | 0.1 m/s       |
//!
//! Equality, hashing and ordering use **only** the integer fields.  The
//! search driver keys its maps by `Node`, so two expansion paths that land on
//! the same quantized state collapse into one vertex with no floating-point
//! drift.  The `f64` views are computed once at construction for cheap reads
//! on hot paths.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Internal units per metre.
pub const DISTANCE_SCALE: f64 = 10.0;
/// Internal units per second.
pub const TIME_SCALE: f64 = 10.0;
/// Internal units per metre-per-second.
pub const SPEED_SCALE: f64 = 10.0;

/// An immutable, quantized vehicle state.
#[derive(Copy, Clone, Debug)]
pub struct Node {
    distance: i64,
    time:     i64,
    speed:    i64,

    distance_m: f64,
    time_s:     f64,
    speed_mps:  f64,
}

impl Node {
    /// Build from real-world units, rounding each value half-up to the
    /// nearest internal unit.
    pub fn from_real(distance_m: f64, time_s: f64, speed_mps: f64) -> Self {
        Self::from_internal(
            quantize(distance_m, DISTANCE_SCALE),
            quantize(time_s, TIME_SCALE),
            quantize(speed_mps, SPEED_SCALE),
        )
    }

    /// Build directly from internal units.  No rounding takes place.
    pub fn from_internal(distance: i64, time: i64, speed: i64) -> Self {
        Self {
            distance,
            time,
            speed,
            distance_m: distance as f64 / DISTANCE_SCALE,
            time_s:     time as f64 / TIME_SCALE,
            speed_mps:  speed as f64 / SPEED_SCALE,
        }
    }

    // ── Internal units ────────────────────────────────────────────────────

    /// Distance in 0.1 m units.
    #[inline]
    pub fn distance(&self) -> i64 {
        self.distance
    }

    /// Time in 0.1 s units.
    #[inline]
    pub fn time(&self) -> i64 {
        self.time
    }

    /// Speed in 0.1 m/s units.
    #[inline]
    pub fn speed(&self) -> i64 {
        self.speed
    }

    // ── Real-world units ──────────────────────────────────────────────────

    #[inline]
    pub fn distance_m(&self) -> f64 {
        self.distance_m
    }

    #[inline]
    pub fn time_s(&self) -> f64 {
        self.time_s
    }

    #[inline]
    pub fn speed_mps(&self) -> f64 {
        self.speed_mps
    }

    #[inline]
    fn key(&self) -> (i64, i64, i64) {
        (self.distance, self.time, self.speed)
    }
}

/// Round half-up into integer units.  Non-finite input quantizes to zero.
#[inline]
fn quantize(value: f64, scale: f64) -> i64 {
    if !value.is_finite() {
        return 0;
    }
    (value * scale + 0.5).floor() as i64
}

impl PartialEq for Node {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl Ord for Node {
    /// Earliest time first, then lowest speed, then shortest distance.
    fn cmp(&self, other: &Self) -> Ordering {
        self.time
            .cmp(&other.time)
            .then(self.speed.cmp(&other.speed))
            .then(self.distance.cmp(&other.distance))
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Node{{distance={:8}, time={:6}, speed={:4}}}",
            self.distance, self.time, self.speed
        )
    }
}
