//! `ead-search` — best-first graph search over quantized states.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                     |
//! |------------|--------------------------------------------------------------|
//! | [`driver`] | `search`, `search_bounded`, `SearchPath`, `SearchStats`      |
//! | [`cost`]   | `NeighborGenerator`, `CostModel`, `Heuristic` + defaults     |
//! | [`error`]  | `SearchError`, `SearchResult<T>`                             |
//!
//! The driver knows nothing about signals or vehicle dynamics: the neighbor
//! generator, edge cost and heuristic are all supplied by the caller, so the
//! same loop serves both the coarse and the fine planning pass.

pub mod cost;
pub mod driver;
pub mod error;


pub use cost::{
    CostModel, FuelProxyCost, Heuristic, NeighborGenerator, RemainingDistanceHeuristic,
    TravelTimeCost, ZeroHeuristic,
};
pub use driver::{SearchPath, SearchStats, search, search_bounded};
pub use error::{SearchError, SearchResult};
