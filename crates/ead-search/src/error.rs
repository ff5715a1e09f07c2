use thiserror::Error;

/// Boxed error raised by a [`NeighborGenerator`][crate::NeighborGenerator].
pub type ExpansionError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("no path found after expanding {expanded} states")]
    NoPathFound { expanded: usize },

    #[error("search exceeded the limit of {0} expansions")]
    ExpansionLimit(usize),

    #[error("neighbor generation failed: {0}")]
    Expansion(#[source] ExpansionError),
}

pub type SearchResult<T> = Result<T, SearchError>;
