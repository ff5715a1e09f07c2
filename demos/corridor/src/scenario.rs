//! Scenario file: planner parameters, vehicle state and one signal snapshot.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use ead_core::{EadConfig, VehicleState};
use ead_signal::{Intersection, IntersectionSnapshot};

/// Built-in scenario used when no path is given on the command line.
pub const DEFAULT_SCENARIO: &str = include_str!("../scenarios/two_lights.toml");

#[derive(Deserialize)]
struct ScenarioFile {
    #[serde(default)]
    config:        EadConfig,
    vehicle:       VehicleState,
    #[serde(default)]
    intersections: Vec<Intersection>,
}

pub struct Scenario {
    pub config:   EadConfig,
    pub vehicle:  VehicleState,
    pub snapshot: IntersectionSnapshot,
}

impl Scenario {
    pub fn parse(text: &str) -> Result<Self> {
        let file: ScenarioFile = toml::from_str(text).context("malformed scenario")?;
        file.config.validate().context("invalid [config]")?;
        let snapshot =
            IntersectionSnapshot::new(file.intersections).context("invalid [[intersections]]")?;
        Ok(Self { config: file.config, vehicle: file.vehicle, snapshot })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::parse(&text)
    }
}
