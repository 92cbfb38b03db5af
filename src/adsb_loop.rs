use std::collections::HashMap;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use nalgebra::Vector3;
use tracing::debug;

use crate::clock::Clock;
use crate::config::AdsbConfig;
use crate::errors::Result;
use crate::fcc::Fcc;
use crate::math::horizontal_perpendicular;
use crate::physics_loop::VehicleSnapshot;
use crate::simulation_state::SimulationState;
use crate::telemetry::{emit, TelemetryCallback, TelemetryEvent};

const DISTANCE_EPSILON: f64 = 1e-6;

/// Geometry of a single pairwise conjunction, computed from a snapshot.
struct Conjunction {
    time_to_closest_approach: f64,
    miss_distance_vector: Vector3<f64>,
    miss_distance: f64,
}

/// Low-rate conflict-detection and vector-sharing avoidance observer
/// (component C6). Reads vehicle snapshots published by
/// [`crate::physics_loop::PhysicsLoop`] and mutates FCC setpoints through
/// each aircraft's own mutex, never touching `Vehicle` state directly.
pub struct AdsbLoop {
    config: AdsbConfig,
    state: Arc<SimulationState>,
    snapshots: Arc<RwLock<Vec<VehicleSnapshot>>>,
    fccs: Vec<(u32, Arc<Mutex<Fcc>>)>,
    telemetry: Option<Arc<TelemetryCallback>>,
    minimal_relative_distance: f64,
}

impl AdsbLoop {
    pub fn new(
        config: AdsbConfig,
        state: Arc<SimulationState>,
        snapshots: Arc<RwLock<Vec<VehicleSnapshot>>>,
        fccs: Vec<(u32, Arc<Mutex<Fcc>>)>,
    ) -> Self {
        Self {
            config,
            state,
            snapshots,
            fccs,
            telemetry: None,
            minimal_relative_distance: f64::INFINITY,
        }
    }

    pub fn with_telemetry(mut self, callback: Arc<TelemetryCallback>) -> Self {
        self.telemetry = Some(callback);
        self
    }

    pub fn minimal_relative_distance(&self) -> f64 {
        self.minimal_relative_distance
    }

    /// Run one conflict-detection cycle against the current snapshot.
    pub fn step(&mut self) -> Result<()> {
        let snapshot = self.snapshots.read().expect("snapshot lock poisoned").clone();
        let by_id: HashMap<u32, VehicleSnapshot> = snapshot.iter().map(|s| (s.id, *s)).collect();

        for (id, fcc) in &self.fccs {
            if let Some(s) = by_id.get(id) {
                fcc.lock().expect("fcc mutex poisoned").append_visited(s.position);
            }
        }

        // An aircraft conflicting with more than one peer in the same cycle
        // (only possible with three aircraft) accumulates one combined
        // resolution here rather than calling `apply_evade_maneuver` once
        // per conflicting pair, which would push a separate waypoint for
        // each pair and only track the last one for `reset_evade_maneuver`.
        let mut resolutions: HashMap<u32, Vector3<f64>> = HashMap::new();

        for i in 0..self.fccs.len() {
            for j in (i + 1)..self.fccs.len() {
                let (id_i, _) = &self.fccs[i];
                let (id_j, _) = &self.fccs[j];
                let (Some(&vi), Some(&vj)) = (by_id.get(id_i), by_id.get(id_j)) else {
                    continue;
                };

                let Some(conjunction) = closest_approach(vi.position, vi.velocity, vj.position, vj.velocity) else {
                    continue;
                };

                self.minimal_relative_distance = self.minimal_relative_distance.min(conjunction.miss_distance);

                let conflict = conjunction.miss_distance < self.state.minimum_separation()
                    && conjunction.time_to_closest_approach <= self.config.horizon_s;

                if !conflict {
                    continue;
                }

                emit(
                    &self.telemetry,
                    TelemetryEvent::ConflictDetected {
                        first_id: *id_i,
                        second_id: *id_j,
                        miss_distance: conjunction.miss_distance,
                        time_to_closest_approach: conjunction.time_to_closest_approach,
                    },
                );

                if !self.state.avoidance_active() {
                    continue;
                }

                let speed_i = vi.velocity.norm();
                let speed_j = vj.velocity.norm();
                if speed_i < DISTANCE_EPSILON && speed_j < DISTANCE_EPSILON {
                    continue;
                }
                let w_i = speed_i / (speed_i + speed_j);
                let w_j = speed_j / (speed_i + speed_j);

                let unresolved = self.state.minimum_separation() - conjunction.miss_distance;
                let m_hat = if conjunction.miss_distance > DISTANCE_EPSILON {
                    conjunction.miss_distance_vector / conjunction.miss_distance
                } else {
                    // Exact tie: pick a deterministic perpendicular direction,
                    // lower-id aircraft takes the positive sign.
                    let perp = horizontal_perpendicular(vj.velocity - vi.velocity);
                    if id_i < id_j {
                        -perp
                    } else {
                        perp
                    }
                };

                *resolutions.entry(*id_i).or_insert_with(Vector3::zeros) += -m_hat * unresolved * w_i;
                *resolutions.entry(*id_j).or_insert_with(Vector3::zeros) += m_hat * unresolved * w_j;

                debug!(a = id_i, b = id_j, "conflict resolved into combined avoidance vector");
            }
        }

        for (id, fcc) in &self.fccs {
            let mut f = fcc.lock().expect("fcc mutex poisoned");
            match resolutions.get(id) {
                Some(&resolution) => {
                    if f.evade_maneuver {
                        f.reset_evade_maneuver();
                    }
                    // Safe: an id only lands in `resolutions` after being read
                    // out of `by_id` above.
                    let position = by_id.get(id).expect("resolved id was read from by_id").position;
                    f.apply_evade_maneuver(position, resolution);
                    f.safe_zone_occupied = true;
                    emit(&self.telemetry, TelemetryEvent::ManeuverApplied { aircraft_id: *id });
                }
                None if f.evade_maneuver => {
                    f.reset_evade_maneuver();
                    f.safe_zone_occupied = false;
                }
                None => {}
            }
        }

        let cycle = self.state.adsb_cycles.fetch_add(1, Ordering::Relaxed) + 1;
        emit(
            &self.telemetry,
            TelemetryEvent::AdsbCycle {
                cycle,
                minimal_relative_distance: self.minimal_relative_distance,
            },
        );

        Ok(())
    }

    /// Real-time driver loop, analogous to [`crate::physics_loop::PhysicsLoop::run`]
    /// but at the (much lower) ADS-B cadence. Returns the final
    /// minimal-relative-distance accumulator once stopped.
    pub fn run(&mut self, clock: &dyn Clock, stop_rx: &crossbeam_channel::Receiver<()>) -> Result<f64> {
        let dt = Duration::from_secs_f64(self.config.dt());
        let mut next_tick = clock.now() + dt;

        loop {
            if stop_rx.try_recv().is_ok() || !self.state.is_running() {
                return Ok(self.minimal_relative_distance);
            }
            if self.state.is_paused() {
                clock.sleep(Duration::from_millis(10));
                continue;
            }

            let now = clock.now();
            if now < next_tick {
                clock.sleep(next_tick - now);
            } else if now > next_tick {
                next_tick = now;
            }

            self.step()?;
            next_tick += dt;

            if self.state.collision() {
                return Ok(self.minimal_relative_distance);
            }
        }
    }
}

fn closest_approach(
    pi: Vector3<f64>,
    vi: Vector3<f64>,
    pj: Vector3<f64>,
    vj: Vector3<f64>,
) -> Option<Conjunction> {
    let r = pj - pi;
    let v = vj - vi;
    let v_norm_sq = v.norm_squared();
    if v_norm_sq < DISTANCE_EPSILON {
        return None;
    }
    let t_star = (-(r.dot(&v)) / v_norm_sq).max(0.0);
    let miss_distance_vector = r + v * t_star;
    let miss_distance = miss_distance_vector.norm();
    Some(Conjunction {
        time_to_closest_approach: t_star,
        miss_distance_vector,
        miss_distance,
    })
}
