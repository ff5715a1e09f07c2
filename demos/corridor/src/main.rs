//! corridor — plan an eco-approach trajectory through a signalized corridor.
//!
//! ```text
//! corridor [SCENARIO.toml] [OUTPUT.csv]
//! ```
//!
//! Without arguments the built-in two-signal scenario is planned and the
//! trajectory written to `trajectory.csv`.  Set `RUST_LOG=debug` to see the
//! individual search passes.

mod scenario;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use log::info;

use ead_planner::{EadPlanner, Trajectory};

use scenario::{DEFAULT_SCENARIO, Scenario};

const DEFAULT_OUTPUT: &str = "trajectory.csv";

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let scenario = match args.next() {
        Some(path) => Scenario::load(Path::new(&path))?,
        None => Scenario::parse(DEFAULT_SCENARIO)?,
    };
    let output = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

    info!(
        "{} intersections, vehicle at {:.1} m doing {:.1} m/s",
        scenario.snapshot.len(),
        scenario.vehicle.distance_m,
        scenario.vehicle.speed_mps
    );

    let planner = EadPlanner::new(scenario.config)?;
    let started = Instant::now();
    let plan = planner.plan(scenario.vehicle, &scenario.snapshot)?;
    let elapsed = started.elapsed();

    println!("Coarse waypoints:");
    for node in &plan.coarse {
        println!(
            "  {:>8.1} m  {:>6.1} s  {:>5.1} m/s",
            node.distance_m(),
            node.time_s(),
            node.speed_mps()
        );
    }
    println!(
        "Path: {} states ({}), coarse expansions {}, planned in {:.1} ms",
        plan.path.len(),
        if plan.refined { "refined" } else { "coarse only" },
        plan.stats.coarse.expanded,
        elapsed.as_secs_f64() * 1e3
    );

    let trajectory = Trajectory::from_path(&plan.path);
    trajectory.write_csv(&output)?;
    println!("Wrote {} rows to {}", trajectory.points().len(), output.display());
    Ok(())
}
