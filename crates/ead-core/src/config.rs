//! Planner configuration and vehicle state.
//!
//! `EadConfig` is an explicit value handed to every generator and planner
//! constructor; nothing reads tunables from process-wide state.  It is
//! typically loaded from a TOML parameter file:
//!
//! ```toml
//! max_accel_mps2      = 2.0
//! lag_time_s          = 1.9
//! speed_limit_mps     = 20.0
//! operating_speed_mps = 15.0
//! ```
//!
//! Missing keys take the defaults documented on each field.

use std::path::Path;

use serde::Deserialize;

use crate::{ConfigError, ConfigResult, Node};

/// Minimum separation between the last stop bar and the terminal node, in
/// metres.
pub const TYPICAL_INTERSECTION_WIDTH_M: f64 = 40.0;

// ── EadConfig ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EadConfig {
    /// Acceleration magnitude limit, m/s².  Default: 2.0.
    pub max_accel_mps2: f64,

    /// Delay between a commanded speed change and its physical onset, s.
    /// Default: 1.9.
    pub lag_time_s: f64,

    /// Road speed limit, m/s.  Default: 20.0.
    pub speed_limit_mps: f64,

    /// Target cruise speed beyond the last intersection, m/s.  Default: 15.0.
    pub operating_speed_mps: f64,

    /// Below this speed a green-window candidate is not worth planning for,
    /// m/s.  Default: 2.2 (≈ 5 mph).
    pub crawling_speed_mps: f64,

    /// Safety margin kept clear at both ends of a green phase, s.  Default: 4.0.
    pub time_buffer_s: f64,

    /// Spacing of candidate arrival times in the coarse fan, s.  Default: 1.0.
    pub time_increment_s: f64,

    /// Fraction of `max_accel_mps2` used for the terminal hop.  Default: 0.75.
    pub terminal_accel_fraction: f64,

    /// A stop bar closer than this is treated as already reached, m.
    /// Default: 1.0.
    pub stop_bar_tolerance_m: f64,

    /// Upper bound on neighbors emitted per expansion.  Default: 64.
    pub max_neighbors: usize,

    /// Upper bound on phase transitions walked when projecting to the next
    /// green onset.  Default: 64.
    pub max_phase_steps: usize,

    /// Duration of one fine-resolution hop, s.  Default: 1.0.
    pub fine_time_step_s: f64,

    /// Speed quantum between fine-resolution candidates, m/s.  Default: 1.0.
    pub fine_speed_step_mps: f64,

    /// Fine candidates per direction (slower/faster).  Default: 2.
    pub fine_speed_steps: usize,

    /// Optional cap on search expansions.  `None` means unbounded.
    pub max_expansions: Option<usize>,

    /// Cap on expansions in the fine pass; the planner falls back to the
    /// coarse path when it is hit.  Default: 20000.
    pub fine_max_expansions: usize,
}

impl Default for EadConfig {
    fn default() -> Self {
        Self {
            max_accel_mps2:          2.0,
            lag_time_s:              1.9,
            speed_limit_mps:         20.0,
            operating_speed_mps:     15.0,
            crawling_speed_mps:      2.2,
            time_buffer_s:           4.0,
            time_increment_s:        1.0,
            terminal_accel_fraction: 0.75,
            stop_bar_tolerance_m:    1.0,
            max_neighbors:           64,
            max_phase_steps:         64,
            fine_time_step_s:        1.0,
            fine_speed_step_mps:     1.0,
            fine_speed_steps:        2,
            max_expansions:          None,
            fine_max_expansions:     20_000,
        }
    }
}

impl EadConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> ConfigResult<Self> {
        let config: EadConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject physically meaningless parameters.
    pub fn validate(&self) -> ConfigResult<()> {
        positive("max_accel_mps2", self.max_accel_mps2)?;
        non_negative("lag_time_s", self.lag_time_s)?;
        positive("speed_limit_mps", self.speed_limit_mps)?;
        positive("operating_speed_mps", self.operating_speed_mps)?;
        positive("crawling_speed_mps", self.crawling_speed_mps)?;
        non_negative("time_buffer_s", self.time_buffer_s)?;
        positive("time_increment_s", self.time_increment_s)?;
        positive("terminal_accel_fraction", self.terminal_accel_fraction)?;
        non_negative("stop_bar_tolerance_m", self.stop_bar_tolerance_m)?;
        positive("fine_time_step_s", self.fine_time_step_s)?;
        positive("fine_speed_step_mps", self.fine_speed_step_mps)?;

        if self.operating_speed_mps > self.speed_limit_mps {
            return Err(invalid(
                "operating_speed_mps",
                format!(
                    "{} exceeds speed_limit_mps {}",
                    self.operating_speed_mps, self.speed_limit_mps
                ),
            ));
        }
        if self.crawling_speed_mps >= self.operating_speed_mps {
            return Err(invalid(
                "crawling_speed_mps",
                format!(
                    "{} must be below operating_speed_mps {}",
                    self.crawling_speed_mps, self.operating_speed_mps
                ),
            ));
        }
        if self.terminal_accel_fraction > 1.0 {
            return Err(invalid("terminal_accel_fraction", "must not exceed 1.0".into()));
        }
        if self.max_neighbors == 0 {
            return Err(invalid("max_neighbors", "must be at least 1".into()));
        }
        if self.max_phase_steps < 4 {
            return Err(invalid("max_phase_steps", "must cover a full cycle (>= 4)".into()));
        }
        if self.fine_max_expansions == 0 {
            return Err(invalid("fine_max_expansions", "must be at least 1".into()));
        }
        if self.max_expansions == Some(0) {
            return Err(invalid("max_expansions", "must be at least 1 when set".into()));
        }
        Ok(())
    }

    /// Acceleration used for the hop beyond the last intersection, m/s².
    #[inline]
    pub fn terminal_accel_mps2(&self) -> f64 {
        self.max_accel_mps2 * self.terminal_accel_fraction
    }
}

/// Load and validate an [`EadConfig`] from a TOML file.
pub fn load_config(path: &Path) -> ConfigResult<EadConfig> {
    let text = std::fs::read_to_string(path)?;
    EadConfig::from_toml_str(&text)
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

fn positive(field: &'static str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("{value} must be finite and > 0")))
    }
}

fn non_negative(field: &'static str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("{value} must be finite and >= 0")))
    }
}

// ── VehicleState ──────────────────────────────────────────────────────────────

/// Current vehicle state in real-world units, as reported by localization.
#[derive(Copy, Clone, Debug, PartialEq, Deserialize)]
pub struct VehicleState {
    /// Downtrack distance, m.
    pub distance_m: f64,
    /// Plan-relative time, s.
    pub time_s: f64,
    /// Longitudinal speed, m/s.
    pub speed_mps: f64,
}

impl VehicleState {
    pub fn new(distance_m: f64, time_s: f64, speed_mps: f64) -> Self {
        Self { distance_m, time_s, speed_mps }
    }

    /// `true` if every field is finite and the speed is not negative.
    pub fn is_valid(&self) -> bool {
        self.distance_m.is_finite()
            && self.time_s.is_finite()
            && self.speed_mps.is_finite()
            && self.speed_mps >= 0.0
    }

    /// Boundary conversion into the quantized search space.
    #[inline]
    pub fn to_node(self) -> Node {
        Node::from_real(self.distance_m, self.time_s, self.speed_mps)
    }
}
