//! `ead-neighbors` — successor generation for the EAD trajectory search.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                      |
//! |------------|---------------------------------------------------------------|
//! | [`timing`] | Kinematic arrival, terminal hop, crossing-time helpers        |
//! | [`coarse`] | `CoarseNeighbors`: one hop per intersection                  |
//! | [`fine`]   | `FineNeighbors`: fixed time-step hops with speed sampling    |
//!
//! Both generators implement [`ead_search::NeighborGenerator`] and read
//! signal timing through [`ead_signal::PhaseOracle`].  They differ only in
//! how densely they sample the (distance, time, speed) space.
//!
//! # Nomenclature
//!
//! A point along the planned path is a *location* (`loc`); the gap between
//! two locations is a *distance* (`dist`).

pub mod coarse;
pub mod fine;
pub mod timing;

#[cfg(test)]
mod tests;

pub use coarse::CoarseNeighbors;
pub use fine::FineNeighbors;
