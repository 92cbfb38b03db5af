use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::adsb_loop::AdsbLoop;
use crate::aircraft::Aircraft;
use crate::clock::Clock;
use crate::config::SimulationConfig;
use crate::errors::{Result, SimError};
use crate::math::yaw_of;
use crate::physics_loop::{PhysicsLoop, VehicleSnapshot};
use crate::simulation_state::SimulationState;
use crate::telemetry::TelemetryCallback;

/// One aircraft's starting pose, target and roll angle within a scenario.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AircraftInit {
    pub id: u32,
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    pub target: Vector3<f64>,
    pub roll_angle: f64,
}

/// Initial conditions for a reproducible scenario run: two aircraft by
/// default, three when the scenario calls for a multi-conflict case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioRecord {
    pub test_id: u32,
    pub aircraft: Vec<AircraftInit>,
    /// Inter-aircraft bearing at t=0, degrees, computed from the first two
    /// aircraft's initial positions.
    pub aircraft_angle: f64,
}

impl ScenarioRecord {
    pub fn pair(test_id: u32, a1: AircraftInit, a2: AircraftInit) -> Result<Self> {
        Self::new(test_id, vec![a1, a2])
    }

    pub fn triple(test_id: u32, a1: AircraftInit, a2: AircraftInit, a3: AircraftInit) -> Result<Self> {
        Self::new(test_id, vec![a1, a2, a3])
    }

    fn new(test_id: u32, aircraft: Vec<AircraftInit>) -> Result<Self> {
        if aircraft.len() < 2 || aircraft.len() > 3 {
            return Err(SimError::InvalidScenario(format!(
                "scenario must have 2 or 3 aircraft, got {}",
                aircraft.len()
            )));
        }
        let mut ids: Vec<u32> = aircraft.iter().map(|a| a.id).collect();
        ids.sort_unstable();
        ids.dedup();
        if ids.len() != aircraft.len() {
            return Err(SimError::InvalidScenario("aircraft ids must be unique".into()));
        }
        for a in &aircraft {
            for v in [a.position, a.velocity, a.target] {
                if v.iter().any(|c| !c.is_finite()) {
                    return Err(SimError::InvalidScenario(format!(
                        "aircraft {} has a non-finite field",
                        a.id
                    )));
                }
            }
        }
        let delta = aircraft[1].position - aircraft[0].position;
        let aircraft_angle = yaw_of(delta.x, delta.y);
        Ok(Self {
            test_id,
            aircraft,
            aircraft_angle,
        })
    }
}

/// A [`ScenarioRecord`] extended with the outcome of one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub record: ScenarioRecord,
    pub final_positions: Vec<Vector3<f64>>,
    pub final_velocities: Vec<Vector3<f64>>,
    pub collision: bool,
    pub minimal_relative_distance: f64,
    /// Recorded for reproducibility since physics rate is a scenario
    /// parameter, not a fixed constant.
    pub physics_rate_hz: f64,
    pub elapsed_s: f64,
}

/// Non-visual driver (component C7): seeds aircraft from a
/// [`ScenarioRecord`], runs both loops, and harvests a [`ScenarioResult`].
pub struct ScenarioRunner {
    config: SimulationConfig,
    telemetry: Option<Arc<TelemetryCallback>>,
}

impl ScenarioRunner {
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            telemetry: None,
        }
    }

    pub fn with_telemetry(mut self, callback: Arc<TelemetryCallback>) -> Self {
        self.telemetry = Some(callback);
        self
    }

    fn build_aircraft(&self, record: &ScenarioRecord) -> Vec<Aircraft> {
        record
            .aircraft
            .iter()
            .map(|init| {
                Aircraft::new(
                    init.id,
                    init.position,
                    init.velocity,
                    init.target,
                    init.roll_angle,
                    self.config.vehicle_size,
                    self.config.world_bound,
                )
            })
            .collect()
    }

    fn snapshot_of(aircraft: &[Aircraft]) -> Vec<VehicleSnapshot> {
        aircraft
            .iter()
            .map(|a| VehicleSnapshot {
                id: a.vehicle.id,
                position: a.vehicle.position,
                velocity: a.vehicle.velocity,
                size: a.vehicle.size,
            })
            .collect()
    }

    fn build_result(
        record: &ScenarioRecord,
        aircraft: &[Aircraft],
        state: &SimulationState,
        minimal_relative_distance: f64,
        physics_rate_hz: f64,
        elapsed_s: f64,
    ) -> ScenarioResult {
        ScenarioResult {
            record: record.clone(),
            final_positions: aircraft.iter().map(|a| a.vehicle.position).collect(),
            final_velocities: aircraft.iter().map(|a| a.vehicle.velocity).collect(),
            collision: state.collision(),
            minimal_relative_distance,
            physics_rate_hz,
            elapsed_s,
        }
    }

    /// Single-threaded cooperative run. Deterministic: ticks are driven by
    /// a plain counter, not a wall clock, so outcomes are reproducible
    /// regardless of host scheduling jitter.
    pub fn run_headless(
        &self,
        record: &ScenarioRecord,
        avoid_collisions: bool,
        duration_s: f64,
    ) -> Result<ScenarioResult> {
        let mut aircraft = self.build_aircraft(record);
        let state = Arc::new(SimulationState::new(false, avoid_collisions, &self.config.adsb));
        let snapshots = Arc::new(RwLock::new(Self::snapshot_of(&aircraft)));
        let fccs: Vec<_> = aircraft.iter().map(|a| (a.id(), a.fcc.clone())).collect();

        let mut physics_loop = PhysicsLoop::new(self.config.physics, state.clone(), snapshots.clone());
        if let Some(cb) = &self.telemetry {
            physics_loop = physics_loop.with_telemetry(cb.clone());
        }
        let mut adsb_loop = AdsbLoop::new(self.config.adsb, state.clone(), snapshots, fccs);
        if let Some(cb) = &self.telemetry {
            adsb_loop = adsb_loop.with_telemetry(cb.clone());
        }

        let cycles_per_adsb = (self.config.physics.rate_hz / self.config.adsb.rate_hz)
            .round()
            .max(1.0) as u64;
        let total_ticks = (duration_s * self.config.physics.rate_hz).round() as u64;

        let mut tick = 0u64;
        while tick < total_ticks {
            physics_loop.step(&mut aircraft)?;
            tick += 1;
            if state.collision() {
                break;
            }
            if tick % cycles_per_adsb == 0 {
                adsb_loop.step()?;
                if state.collision() {
                    break;
                }
            }
        }

        info!(
            test_id = record.test_id,
            ticks = tick,
            collision = state.collision(),
            "scenario run complete"
        );

        Ok(Self::build_result(
            record,
            &aircraft,
            &state,
            adsb_loop.minimal_relative_distance(),
            self.config.physics.rate_hz,
            tick as f64 / self.config.physics.rate_hz,
        ))
    }

    /// Real-thread run: one OS thread per loop, synchronized through
    /// `clock`. Two independent stop channels are used because a cloned
    /// `crossbeam_channel::Receiver` consumes from a shared queue rather
    /// than broadcasting — each loop needs its own signal.
    pub fn run_threaded(
        &self,
        record: &ScenarioRecord,
        avoid_collisions: bool,
        duration_s: f64,
        clock: Arc<dyn Clock>,
    ) -> Result<ScenarioResult> {
        let aircraft = self.build_aircraft(record);
        let state = Arc::new(SimulationState::new(true, avoid_collisions, &self.config.adsb));
        let snapshots = Arc::new(RwLock::new(Self::snapshot_of(&aircraft)));
        let fccs: Vec<_> = aircraft.iter().map(|a| (a.id(), a.fcc.clone())).collect();
        let aircraft = Arc::new(Mutex::new(aircraft));

        let (physics_stop_tx, physics_stop_rx) = crossbeam_channel::bounded::<()>(1);
        let (adsb_stop_tx, adsb_stop_rx) = crossbeam_channel::bounded::<()>(1);

        let physics_handle = {
            let mut physics_loop = PhysicsLoop::new(self.config.physics, state.clone(), snapshots.clone());
            if let Some(cb) = &self.telemetry {
                physics_loop = physics_loop.with_telemetry(cb.clone());
            }
            let aircraft = aircraft.clone();
            let clock = clock.clone();
            std::thread::spawn(move || physics_loop.run(aircraft, clock.as_ref(), &physics_stop_rx))
        };

        let adsb_handle = {
            let mut adsb_loop = AdsbLoop::new(self.config.adsb, state.clone(), snapshots, fccs);
            if let Some(cb) = &self.telemetry {
                adsb_loop = adsb_loop.with_telemetry(cb.clone());
            }
            let clock = clock.clone();
            std::thread::spawn(move || adsb_loop.run(clock.as_ref(), &adsb_stop_rx))
        };

        clock.sleep(Duration::from_secs_f64(duration_s));
        state.stop();
        let _ = physics_stop_tx.send(());
        let _ = adsb_stop_tx.send(());

        physics_handle
            .join()
            .map_err(|_| SimError::ComputationError("physics thread panicked".into()))??;
        let minimal_relative_distance = adsb_handle
            .join()
            .map_err(|_| SimError::ComputationError("adsb thread panicked".into()))??;

        let aircraft = aircraft.lock().expect("aircraft mutex poisoned");
        Ok(Self::build_result(
            record,
            &aircraft,
            &state,
            minimal_relative_distance,
            self.config.physics.rate_hz,
            duration_s,
        ))
    }
}
