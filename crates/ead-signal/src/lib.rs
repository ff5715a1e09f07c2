//! `ead-signal` — intersection data and signal phase projection.
//!
//! # Crate layout
//!
//! | Module           | Contents                                                  |
//! |------------------|-----------------------------------------------------------|
//! | [`phase`]        | `SignalPhase`, `PhaseCycle`, `SignalState`                |
//! | [`intersection`] | `Intersection`, `IntersectionSnapshot` (validated, sorted)|
//! | [`oracle`]       | `PhaseOracle` trait, `SnapshotOracle`                     |
//! | [`error`]        | `SignalError`, `SignalResult<T>`                          |
//!
//! # Snapshot semantics
//!
//! The V2I ingestion layer owns live signal data.  For each planning call it
//! hands over an [`IntersectionSnapshot`]; the planner borrows it for the
//! duration of one search and never mutates or retains it.  Plan time 0 is
//! the instant the snapshot was taken.

pub mod error;
pub mod intersection;
pub mod oracle;
pub mod phase;


pub use error::{SignalError, SignalResult};
pub use intersection::{Intersection, IntersectionSnapshot};
pub use oracle::{DEFAULT_MAX_PHASE_STEPS, PhaseOracle, SnapshotOracle};
pub use phase::{PhaseCycle, SignalPhase, SignalState};
