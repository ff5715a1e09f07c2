//! Error types for ead-planner.

use thiserror::Error;

use ead_core::ConfigError;
use ead_search::SearchError;
use ead_signal::SignalError;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("signal timing error: {0}")]
    Signal(#[from] SignalError),

    #[error("invalid vehicle state: {0}")]
    InvalidState(String),

    #[error("no feasible trajectory (expanded {expanded} states)")]
    NoPath { expanded: usize },

    #[error("search error: {0}")]
    Search(#[source] SearchError),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<SearchError> for PlanError {
    /// Exhaustion becomes [`PlanError::NoPath`]; signal failures raised by a
    /// neighbor generator are unwrapped back into [`PlanError::Signal`].
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::NoPathFound { expanded } => PlanError::NoPath { expanded },
            SearchError::Expansion(inner) => match inner.downcast::<SignalError>() {
                Ok(signal) => PlanError::Signal(*signal),
                Err(other) => PlanError::Search(SearchError::Expansion(other)),
            },
            other => PlanError::Search(other),
        }
    }
}

/// Alias for `Result<T, PlanError>`.
pub type PlanResult<T> = Result<T, PlanError>;
