use std::collections::VecDeque;

use nalgebra::Vector3;
use tracing::{debug, warn};

use crate::constants::{MAX_PITCH_DEG, MAX_ROLL_DEG};
use crate::errors::{Result, SimError};
use crate::math::{format_yaw_angle, pitch_of, yaw_of};

/// The per-aircraft flight-control computer.
///
/// Owns the destination queue and the yaw/pitch/roll/speed setpoints that
/// [`crate::physics_loop::PhysicsLoop`] converges the vehicle toward each
/// tick. Mutated by the physics loop (`update`, every tick) and by the
/// ADS-B loop (`apply_evade_maneuver`/`reset_evade_maneuver`, at conflict
/// boundaries) — both paths are expected to run behind the same per-FCC
/// mutex (see [`crate::aircraft::Aircraft`]).
#[derive(Debug, Clone)]
pub struct Fcc {
    pub aircraft_id: u32,
    pub destinations: VecDeque<Vector3<f64>>,
    pub destinations_history: Vec<Vector3<f64>>,
    pub visited: Vec<Vector3<f64>>,
    pub autopilot: bool,
    pub ignore_destinations: bool,
    pub initial_target: Vector3<f64>,
    pub target_yaw: f64,
    pub target_pitch: f64,
    pub target_roll: f64,
    pub target_speed: f64,
    pub is_turning_left: bool,
    pub is_turning_right: bool,
    pub safe_zone_occupied: bool,
    pub evade_maneuver: bool,
    pub vector_sharing_resolution: Vector3<f64>,
    world_bound: f64,
    evade_waypoint: Option<Vector3<f64>>,
}

impl Fcc {
    pub fn new(aircraft_id: u32, initial_target: Vector3<f64>, initial_speed: f64) -> Self {
        let mut destinations = VecDeque::new();
        destinations.push_back(initial_target);
        Self {
            aircraft_id,
            destinations,
            destinations_history: Vec::new(),
            visited: Vec::new(),
            autopilot: true,
            ignore_destinations: false,
            initial_target,
            target_yaw: 0.0,
            target_pitch: 0.0,
            target_roll: 0.0,
            target_speed: initial_speed,
            is_turning_left: false,
            is_turning_right: false,
            safe_zone_occupied: false,
            evade_maneuver: false,
            vector_sharing_resolution: Vector3::zeros(),
            world_bound: crate::constants::DEFAULT_WORLD_BOUND,
            evade_waypoint: None,
        }
    }

    pub fn with_world_bound(mut self, world_bound: f64) -> Self {
        self.world_bound = world_bound;
        self
    }

    /// Restore the queue and setpoints to the state at construction.
    pub fn reset(&mut self) {
        self.destinations.clear();
        self.destinations.push_back(self.initial_target);
        self.destinations_history.clear();
        self.visited.clear();
        self.ignore_destinations = false;
        self.target_yaw = 0.0;
        self.target_pitch = 0.0;
        self.target_roll = 0.0;
        self.is_turning_left = false;
        self.is_turning_right = false;
        self.safe_zone_occupied = false;
        self.evade_maneuver = false;
        self.vector_sharing_resolution = Vector3::zeros();
        self.evade_waypoint = None;
    }

    pub fn accelerate(&mut self, delta: f64) {
        self.target_speed = (self.target_speed + delta).max(0.0);
    }

    /// Reject a destination coincident with `current_position`; snap any
    /// component beyond `world_bound` back to that bound.
    fn check_new_destination(
        &self,
        destination: Vector3<f64>,
        current_position: Vector3<f64>,
    ) -> Result<Vector3<f64>> {
        if destination == current_position {
            return Err(SimError::InvalidDestination(
                "destination coincides with current position".into(),
            ));
        }
        let clamp = |v: f64| v.clamp(-self.world_bound, self.world_bound);
        Ok(Vector3::new(
            clamp(destination.x),
            clamp(destination.y),
            clamp(destination.z),
        ))
    }

    pub fn add_last_destination(
        &mut self,
        destination: Vector3<f64>,
        current_position: Vector3<f64>,
    ) -> Result<()> {
        match self.check_new_destination(destination, current_position) {
            Ok(d) => {
                self.destinations.push_back(d);
                self.ignore_destinations = false;
                Ok(())
            }
            Err(e) => {
                warn!(aircraft_id = self.aircraft_id, error = %e, "rejected destination");
                Err(e)
            }
        }
    }

    pub fn add_first_destination(
        &mut self,
        destination: Vector3<f64>,
        current_position: Vector3<f64>,
    ) -> Result<()> {
        match self.check_new_destination(destination, current_position) {
            Ok(d) => {
                self.destinations.push_front(d);
                self.ignore_destinations = false;
                Ok(())
            }
            Err(e) => {
                warn!(aircraft_id = self.aircraft_id, error = %e, "rejected destination");
                Err(e)
            }
        }
    }

    /// Sample `position` into the visited trail. Called at ADS-B cadence.
    pub fn append_visited(&mut self, position: Vector3<f64>) {
        self.visited.push(position);
    }

    /// Run every physics tick: refresh yaw/pitch setpoints from the active
    /// destination, then the roll setpoint that steers toward that yaw.
    pub fn update(&mut self, current_position: Vector3<f64>, current_yaw: f64, arrival_radius: f64) {
        self.update_target_yaw_pitch_angles(current_position, arrival_radius);
        self.update_target_roll_angle(current_yaw);
    }

    fn update_target_yaw_pitch_angles(&mut self, current_position: Vector3<f64>, arrival_radius: f64) {
        if let Some(&head) = self.destinations.front() {
            if (head - current_position).norm() <= arrival_radius {
                let reached = self.destinations.pop_front().expect("front checked above");
                self.destinations_history.push(reached);
                debug!(aircraft_id = self.aircraft_id, "destination reached");
                if self.destinations.is_empty() {
                    self.ignore_destinations = true;
                }
            }
        }

        if let Some(&head) = self.destinations.front() {
            let delta = head - current_position;
            let horizontal = (delta.x.powi(2) + delta.y.powi(2)).sqrt();
            self.target_yaw = yaw_of(delta.x, delta.y);
            self.target_pitch = pitch_of(delta.z, horizontal, MAX_PITCH_DEG);
        }
        // Empty queue: setpoints hold their previous values, whether or not
        // ignore_destinations was just set.
    }

    fn update_target_roll_angle(&mut self, current_yaw: f64) {
        let delta = format_yaw_angle(self.target_yaw - current_yaw);
        self.target_roll = delta.signum() * delta.abs().min(MAX_ROLL_DEG);
        if delta == 0.0 {
            self.target_roll = 0.0;
        }
        self.is_turning_right = delta > 0.0;
        self.is_turning_left = delta < 0.0;
    }

    /// Inject an avoidance waypoint derived from a geometric vector-sharing
    /// resolution computed by the ADS-B loop (see
    /// [`crate::adsb_loop::AdsbLoop`]). The margin that pushes the detour
    /// outside the opponent's safe zone is expected to already be baked
    /// into `resolution`'s magnitude by the caller.
    pub fn apply_evade_maneuver(&mut self, current_position: Vector3<f64>, resolution: Vector3<f64>) {
        self.vector_sharing_resolution = resolution;
        let waypoint = current_position + resolution;
        self.destinations.push_front(waypoint);
        self.evade_waypoint = Some(waypoint);
        self.evade_maneuver = true;
        self.ignore_destinations = false;
        debug!(aircraft_id = self.aircraft_id, ?waypoint, "evade maneuver applied");
    }

    /// Undo `apply_evade_maneuver`, restoring the destination queue
    /// byte-for-byte provided no other destination was pushed meanwhile.
    pub fn reset_evade_maneuver(&mut self) {
        if !self.evade_maneuver {
            return;
        }
        if let Some(injected) = self.evade_waypoint.take() {
            if self.destinations.front() == Some(&injected) {
                self.destinations.pop_front();
            }
        }
        self.evade_maneuver = false;
        self.vector_sharing_resolution = Vector3::zeros();
        debug!(aircraft_id = self.aircraft_id, "evade maneuver cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_destination_at_current_position() {
        let mut fcc = Fcc::new(0, Vector3::new(10.0, 0.0, 0.0), 50.0);
        let here = Vector3::new(0.0, 0.0, 0.0);
        assert!(fcc.add_last_destination(here, here).is_err());
    }

    #[test]
    fn snaps_destination_beyond_world_bound() {
        let mut fcc = Fcc::new(0, Vector3::new(10.0, 0.0, 0.0), 50.0).with_world_bound(1000.0);
        let here = Vector3::zeros();
        fcc.add_last_destination(Vector3::new(5000.0, 0.0, 0.0), here)
            .unwrap();
        assert_eq!(fcc.destinations.back().unwrap().x, 1000.0);
    }

    #[test]
    fn add_first_destination_rejects_destination_at_current_position() {
        let mut fcc = Fcc::new(0, Vector3::new(10.0, 0.0, 0.0), 50.0);
        let here = Vector3::new(0.0, 0.0, 0.0);
        assert!(fcc.add_first_destination(here, here).is_err());
    }

    #[test]
    fn add_first_destination_snaps_destination_beyond_world_bound() {
        let mut fcc = Fcc::new(0, Vector3::new(10.0, 0.0, 0.0), 50.0).with_world_bound(1000.0);
        let here = Vector3::zeros();
        fcc.add_first_destination(Vector3::new(5000.0, 0.0, 0.0), here)
            .unwrap();
        assert_eq!(fcc.destinations.front().unwrap().x, 1000.0);
    }

    #[test]
    fn add_first_destination_pushes_to_front_not_back() {
        let mut fcc = Fcc::new(0, Vector3::new(10.0, 0.0, 0.0), 50.0);
        let here = Vector3::zeros();
        fcc.add_first_destination(Vector3::new(20.0, 0.0, 0.0), here)
            .unwrap();
        assert_eq!(fcc.destinations.len(), 2);
        assert_eq!(*fcc.destinations.front().unwrap(), Vector3::new(20.0, 0.0, 0.0));
        assert_eq!(*fcc.destinations.back().unwrap(), Vector3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn update_pops_reached_destination_and_sets_ignore_flag() {
        let mut fcc = Fcc::new(0, Vector3::new(0.0, 10.0, 0.0), 50.0);
        // Within the vehicle's arrival radius of the sole destination.
        fcc.update(Vector3::new(0.0, 9.9, 0.0), 0.0, 5.0);
        assert!(fcc.destinations.is_empty());
        assert!(fcc.ignore_destinations);
        assert_eq!(fcc.destinations_history.len(), 1);
    }

    #[test]
    fn update_computes_yaw_and_pitch_toward_head() {
        let mut fcc = Fcc::new(0, Vector3::new(0.0, 100.0, 0.0), 50.0);
        fcc.update(Vector3::zeros(), 0.0, 5.0);
        // Due north target: yaw 0.
        assert!((fcc.target_yaw - 0.0).abs() < 1e-9);
        assert!((fcc.target_pitch - 0.0).abs() < 1e-9);
    }

    #[test]
    fn roll_direction_matches_turning_flags() {
        let mut fcc = Fcc::new(0, Vector3::new(100.0, 0.0, 0.0), 50.0);
        fcc.update(Vector3::zeros(), 0.0, 5.0);
        // Target is due east (yaw 90) while current yaw is 0: turn right.
        assert!(fcc.is_turning_right);
        assert!(!fcc.is_turning_left);
        assert!(fcc.target_roll > 0.0);
    }

    #[test]
    fn exactly_one_turn_flag_or_neither() {
        let mut fcc = Fcc::new(0, Vector3::new(0.0, 100.0, 0.0), 50.0);
        fcc.update(Vector3::zeros(), 0.0, 5.0);
        assert!(!(fcc.is_turning_left && fcc.is_turning_right));
    }

    #[test]
    fn evade_maneuver_round_trips_destination_queue() {
        let mut fcc = Fcc::new(0, Vector3::new(0.0, 100.0, 0.0), 50.0);
        let before: Vec<_> = fcc.destinations.iter().copied().collect();
        fcc.apply_evade_maneuver(Vector3::zeros(), Vector3::new(50.0, 0.0, 0.0));
        assert!(fcc.evade_maneuver);
        assert_eq!(fcc.destinations.len(), before.len() + 1);
        fcc.reset_evade_maneuver();
        let after: Vec<_> = fcc.destinations.iter().copied().collect();
        assert_eq!(before, after);
        assert!(!fcc.evade_maneuver);
    }

    #[test]
    fn accelerate_never_drives_speed_negative() {
        let mut fcc = Fcc::new(0, Vector3::new(0.0, 100.0, 0.0), 1.0);
        fcc.accelerate(-10.0);
        assert_eq!(fcc.target_speed, 0.0);
    }
}
