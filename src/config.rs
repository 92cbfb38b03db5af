use serde::{Deserialize, Serialize};
use std::fs::File;

use crate::constants::{
    DEFAULT_ADSB_RATE_HZ, DEFAULT_HORIZON_S, DEFAULT_MINIMUM_SEPARATION,
    DEFAULT_PHYSICS_RATE_HZ, DEFAULT_PITCH_DYNAMIC_DELAY_MS, DEFAULT_ROLL_DYNAMIC_DELAY_MS,
    DEFAULT_VEHICLE_SIZE, DEFAULT_WORLD_BOUND, GRAVITY, MAX_ACCELERATION,
};
use crate::errors::{Result, SimError};

/// High-rate integrator configuration.
///
/// `rate_hz` is scenario-configurable rather than a fixed constant — the
/// source material disagrees between a 100 Hz and a 10 Hz physics rate
/// across documents versus recorded datasets, so this crate treats the
/// rate as reproducibility metadata carried on [`crate::scenario::ScenarioResult`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PhysicsConfig {
    pub rate_hz: f64,
    pub gravity: f64,
    pub max_acceleration: f64,
    pub roll_dynamic_delay_ms: f64,
    pub pitch_dynamic_delay_ms: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            rate_hz: DEFAULT_PHYSICS_RATE_HZ,
            gravity: GRAVITY,
            max_acceleration: MAX_ACCELERATION,
            roll_dynamic_delay_ms: DEFAULT_ROLL_DYNAMIC_DELAY_MS,
            pitch_dynamic_delay_ms: DEFAULT_PITCH_DYNAMIC_DELAY_MS,
        }
    }
}

impl PhysicsConfig {
    pub fn dt(&self) -> f64 {
        1.0 / self.rate_hz
    }
}

/// Low-rate conflict-observer configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AdsbConfig {
    pub rate_hz: f64,
    pub minimum_separation: f64,
    pub horizon_s: f64,
}

impl Default for AdsbConfig {
    fn default() -> Self {
        Self {
            rate_hz: DEFAULT_ADSB_RATE_HZ,
            minimum_separation: DEFAULT_MINIMUM_SEPARATION,
            horizon_s: DEFAULT_HORIZON_S,
        }
    }
}

impl AdsbConfig {
    pub fn dt(&self) -> f64 {
        1.0 / self.rate_hz
    }
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub physics: PhysicsConfig,
    pub adsb: AdsbConfig,
    pub vehicle_size: f64,
    pub world_bound: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            adsb: AdsbConfig::default(),
            vehicle_size: DEFAULT_VEHICLE_SIZE,
            world_bound: DEFAULT_WORLD_BOUND,
        }
    }
}

impl SimulationConfig {
    pub fn load(path: &str) -> Result<Self> {
        let file = File::open(path)
            .map_err(|e| SimError::InvalidScenario(format!("cannot open config {path}: {e}")))?;
        serde_yaml::from_reader(file)
            .map_err(|e| SimError::InvalidScenario(format!("malformed config {path}: {e}")))
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let file = File::create(path)
            .map_err(|e| SimError::InvalidScenario(format!("cannot write config {path}: {e}")))?;
        serde_yaml::to_writer(file, self)
            .map_err(|e| SimError::InvalidScenario(format!("cannot serialize config: {e}")))
    }
}
