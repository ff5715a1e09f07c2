//! Signal-subsystem error type.

use thiserror::Error;

/// Errors produced by `ead-signal`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SignalError {
    #[error("intersection index {0} is not in the current snapshot")]
    UnknownIntersection(usize),

    #[error("phase projection for intersection {index} exceeded {steps} steps")]
    PhaseStepLimit { index: usize, steps: usize },

    #[error("invalid intersection snapshot: {0}")]
    InvalidSnapshot(String),
}

pub type SignalResult<T> = Result<T, SignalError>;
