//! `ead-planner` — eco-approach trajectory planning through signalized
//! intersections.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                |
//! |----------------|---------------------------------------------------------|
//! | [`planner`]    | `EadPlanner`, `Plan`, `PlanStats`: coarse + fine pass  |
//! | [`trajectory`] | `Trajectory`, `SpeedSegment`, CSV export                |
//! | [`error`]      | `PlanError`, `PlanResult<T>`                            |
//!
//! # Usage
//!
//! ```rust,ignore
//! use ead_core::{EadConfig, VehicleState};
//! use ead_planner::{EadPlanner, Trajectory};
//!
//! let planner = EadPlanner::new(EadConfig::default())?;
//! let plan = planner.plan(VehicleState::new(0.0, 0.0, 10.0), &snapshot)?;
//! Trajectory::from_path(&plan.path).write_csv(Path::new("trajectory.csv"))?;
//! ```
//!
//! # Feature flags
//!
//! | Feature    | Effect                                                   |
//! |------------|----------------------------------------------------------|
//! | `parallel` | `EadPlanner::plan_batch` runs on the Rayon thread pool   |

pub mod error;
pub mod planner;
pub mod trajectory;


pub use error::{PlanError, PlanResult};
pub use planner::{EadPlanner, Plan, PlanStats};
pub use trajectory::{SpeedSegment, Trajectory};
