//! `ead-core` — foundational types for the `ead` trajectory planner.
//!
//! This crate is a dependency of every other `ead-*` crate.  It has no `ead-*`
//! dependencies and keeps external ones minimal (`thiserror`, `serde`,
//! `toml`).
//!
//! # What lives here
//!
//! | Module     | Contents                                                  |
//! |------------|-----------------------------------------------------------|
//! | [`node`]   | `Node`: quantized (distance, time, speed) search vertex  |
//! | [`config`] | `EadConfig`, `VehicleState`, TOML loading + validation    |
//! | [`error`]  | `ConfigError`, `ConfigResult`                             |

pub mod config;
pub mod error;
pub mod node;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{EadConfig, VehicleState, TYPICAL_INTERSECTION_WIDTH_M, load_config};
pub use error::{ConfigError, ConfigResult};
pub use node::Node;
