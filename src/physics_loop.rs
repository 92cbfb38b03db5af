use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use nalgebra::Vector3;
use tracing::info;

use crate::aircraft::Aircraft;
use crate::clock::Clock;
use crate::config::PhysicsConfig;
use crate::constants::MAX_PITCH_DEG;
use crate::errors::Result;
use crate::math::{normalize_angle, pitch_of, rate_limited_approach, velocity_from_speed_yaw_pitch, yaw_of};
use crate::simulation_state::SimulationState;
use crate::telemetry::{emit, TelemetryCallback, TelemetryEvent};

/// Read-only view of one vehicle, published by [`PhysicsLoop`] at tick
/// boundaries for [`crate::adsb_loop::AdsbLoop`] to read without contending
/// on the vehicle's exclusive writer.
#[derive(Debug, Clone, Copy)]
pub struct VehicleSnapshot {
    pub id: u32,
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    pub size: f64,
}

/// The fixed-Δt integrator (component C5). Reads FCC setpoints, advances
/// vehicle pose, and detects aircraft-aircraft collisions.
pub struct PhysicsLoop {
    config: PhysicsConfig,
    state: Arc<SimulationState>,
    snapshots: Arc<RwLock<Vec<VehicleSnapshot>>>,
    telemetry: Option<Arc<TelemetryCallback>>,
}

impl PhysicsLoop {
    pub fn new(
        config: PhysicsConfig,
        state: Arc<SimulationState>,
        snapshots: Arc<RwLock<Vec<VehicleSnapshot>>>,
    ) -> Self {
        Self {
            config,
            state,
            snapshots,
            telemetry: None,
        }
    }

    pub fn with_telemetry(mut self, callback: Arc<TelemetryCallback>) -> Self {
        self.telemetry = Some(callback);
        self
    }

    /// Advance every aircraft by one Δt and run collision detection.
    /// Returns `true` if a collision was detected on this tick.
    pub fn step(&mut self, aircraft: &mut [Aircraft]) -> Result<bool> {
        let dt = self.config.dt();
        let max_roll_rate = 90.0 / (self.config.roll_dynamic_delay_ms / 1000.0);
        let max_pitch_rate = 45.0 / (self.config.pitch_dynamic_delay_ms / 1000.0);

        for ac in aircraft.iter_mut() {
            self.advance_one(ac, dt, max_roll_rate, max_pitch_rate);
        }

        let collided = self.detect_collisions(aircraft);

        let cycle = self.state.physics_cycles.load(Ordering::Relaxed);
        let positions = aircraft.iter().map(|a| a.vehicle.position).collect();
        emit(&self.telemetry, TelemetryEvent::PhysicsTick { cycle, positions });

        self.publish_snapshots(aircraft);

        Ok(collided)
    }

    fn advance_one(&self, ac: &mut Aircraft, dt: f64, max_roll_rate: f64, max_pitch_rate: f64) {
        let current_position = ac.vehicle.position;
        let current_speed = ac.vehicle.speed();
        let horizontal_speed = (ac.vehicle.velocity.x.powi(2) + ac.vehicle.velocity.y.powi(2)).sqrt();
        let current_yaw = if current_speed > 1e-9 {
            yaw_of(ac.vehicle.velocity.x, ac.vehicle.velocity.y)
        } else {
            0.0
        };
        let current_pitch = if current_speed > 1e-9 {
            pitch_of(ac.vehicle.velocity.z, horizontal_speed, MAX_PITCH_DEG)
        } else {
            0.0
        };

        let (target_roll, target_pitch, target_speed, is_turning_left, is_turning_right) = {
            let mut fcc = ac.fcc.lock().expect("fcc mutex poisoned");
            fcc.update(current_position, current_yaw, ac.vehicle.size);
            (
                fcc.target_roll,
                fcc.target_pitch,
                fcc.target_speed,
                fcc.is_turning_left,
                fcc.is_turning_right,
            )
        };

        // Angular inertia: roll and pitch converge toward their setpoints
        // at a bounded rate rather than snapping instantaneously.
        let roll_delta = rate_limited_approach(ac.vehicle.roll_angle, target_roll, max_roll_rate * dt)
            - ac.vehicle.roll_angle;
        ac.vehicle.roll(roll_delta);
        let new_pitch = rate_limited_approach(current_pitch, target_pitch, max_pitch_rate * dt);

        // Coordinated-turn yaw rate: dpsi/dt = g*tan(roll)/|v_xy|. The
        // formula's own sign is unreliable right at zero bank, so direction
        // comes from the FCC's turn flags instead and the magnitude alone
        // from the formula.
        let turn_rate_deg_s = if horizontal_speed > 1e-6 {
            let rad = crate::math::deg_to_rad(ac.vehicle.roll_angle);
            crate::math::rad_to_deg((self.config.gravity * rad.tan() / horizontal_speed).abs())
        } else {
            0.0
        };
        let yaw_sign = if is_turning_right {
            1.0
        } else if is_turning_left {
            -1.0
        } else {
            0.0
        };
        let new_yaw = normalize_angle(current_yaw + turn_rate_deg_s * yaw_sign * dt);

        let new_speed = rate_limited_approach(current_speed, target_speed, self.config.max_acceleration * dt);

        let new_velocity = velocity_from_speed_yaw_pitch(new_speed, new_yaw, new_pitch);
        ac.vehicle.velocity = new_velocity;
        ac.vehicle.move_by(new_velocity * dt);
    }

    fn detect_collisions(&self, aircraft: &[Aircraft]) -> bool {
        let mut any = false;
        for i in 0..aircraft.len() {
            for j in (i + 1)..aircraft.len() {
                let a = &aircraft[i].vehicle;
                let b = &aircraft[j].vehicle;
                let distance = (a.position - b.position).norm();
                if distance <= a.size + b.size {
                    any = true;
                    let dir_a = b.position - a.position;
                    let dir_b = a.position - b.position;
                    let first_cause = a.velocity.dot(&dir_a) > 0.0;
                    let second_cause = b.velocity.dot(&dir_b) > 0.0;
                    let head_on = first_cause && second_cause;
                    self.state.register_collision(first_cause, second_cause);
                    info!(a = a.id, b = b.id, distance, head_on, "collision detected");
                    emit(
                        &self.telemetry,
                        TelemetryEvent::CollisionDetected {
                            first_id: a.id,
                            second_id: b.id,
                            head_on,
                        },
                    );
                }
            }
        }
        any
    }

    fn publish_snapshots(&self, aircraft: &[Aircraft]) {
        let snapshots: Vec<VehicleSnapshot> = aircraft
            .iter()
            .map(|a| VehicleSnapshot {
                id: a.vehicle.id,
                position: a.vehicle.position,
                velocity: a.vehicle.velocity,
                size: a.vehicle.size,
            })
            .collect();
        *self.snapshots.write().expect("snapshot lock poisoned") = snapshots;
    }

    /// Real-time driver loop: sleeps between ticks aligned to `clock`,
    /// handles pause/stop, and catches up by at most one tick when behind
    /// schedule (never more — logical substeps are skipped instead).
    pub fn run(
        &mut self,
        aircraft: Arc<Mutex<Vec<Aircraft>>>,
        clock: &dyn Clock,
        stop_rx: &crossbeam_channel::Receiver<()>,
    ) -> Result<()> {
        let dt = Duration::from_secs_f64(self.config.dt());
        let mut next_tick = clock.now() + dt;

        loop {
            if stop_rx.try_recv().is_ok() || !self.state.is_running() {
                return Ok(());
            }

            if self.state.is_paused() {
                self.state.begin_pause(clock.now());
                while self.state.is_paused() {
                    if stop_rx.try_recv().is_ok() {
                        self.state.end_pause(clock.now());
                        return Ok(());
                    }
                    clock.sleep(Duration::from_millis(10));
                }
                self.state.end_pause(clock.now());
                next_tick = clock.now() + dt;
            }

            let now = clock.now();
            if now < next_tick {
                clock.sleep(next_tick - now);
            } else if now > next_tick {
                self.state.record_clock_fault();
                next_tick = now;
            }

            {
                let mut guard = aircraft.lock().expect("aircraft mutex poisoned");
                self.step(&mut guard)?;
            }
            self.state.physics_cycles.fetch_add(1, Ordering::Relaxed);
            next_tick += dt;

            if self.state.collision() {
                return Ok(());
            }
        }
    }
}
