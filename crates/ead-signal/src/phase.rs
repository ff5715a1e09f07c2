//! Signal phases and fixed-time phase cycles.

use serde::Deserialize;

/// Signal indication at an intersection approach.
///
/// The cycle order is `Green → Yellow → Red → Green`.  `None` means the
/// indication is unknown; projection treats it as an immediate hand-off to
/// `Red`, the next known phase in the conservative direction.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalPhase {
    Green,
    Yellow,
    Red,
    #[default]
    None,
}

impl SignalPhase {
    /// The phase that follows `self` in a fixed-time cycle.
    #[inline]
    pub fn next(self) -> SignalPhase {
        match self {
            SignalPhase::Green  => SignalPhase::Yellow,
            SignalPhase::Yellow => SignalPhase::Red,
            SignalPhase::Red    => SignalPhase::Green,
            SignalPhase::None   => SignalPhase::Red,
        }
    }

    #[inline]
    pub fn is_known(self) -> bool {
        !matches!(self, SignalPhase::None)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SignalPhase::Green  => "green",
            SignalPhase::Yellow => "yellow",
            SignalPhase::Red    => "red",
            SignalPhase::None   => "none",
        }
    }
}

impl std::fmt::Display for SignalPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── PhaseCycle ────────────────────────────────────────────────────────────────

/// Durations of each phase of a static (non-adaptive) signal plan, seconds.
#[derive(Copy, Clone, Debug, PartialEq, Deserialize)]
pub struct PhaseCycle {
    pub green_s:  f64,
    pub yellow_s: f64,
    pub red_s:    f64,
}

impl PhaseCycle {
    pub fn new(green_s: f64, yellow_s: f64, red_s: f64) -> Self {
        Self { green_s, yellow_s, red_s }
    }

    /// Duration of `phase`.  The unknown phase has zero duration.
    #[inline]
    pub fn duration(&self, phase: SignalPhase) -> f64 {
        match phase {
            SignalPhase::Green  => self.green_s,
            SignalPhase::Yellow => self.yellow_s,
            SignalPhase::Red    => self.red_s,
            SignalPhase::None   => 0.0,
        }
    }

    /// Length of one full cycle.
    #[inline]
    pub fn cycle_s(&self) -> f64 {
        self.green_s + self.yellow_s + self.red_s
    }

    pub(crate) fn is_valid(&self) -> bool {
        [self.green_s, self.yellow_s, self.red_s]
            .iter()
            .all(|d| d.is_finite() && *d > 0.0)
    }
}

// ── SignalState ───────────────────────────────────────────────────────────────

/// Phase active at a queried time and how long it has left.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SignalState {
    pub phase: SignalPhase,
    pub time_remaining_s: f64,
}
