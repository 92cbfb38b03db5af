use std::sync::{Arc, Mutex};

use nalgebra::Vector3;

use crate::fcc::Fcc;
use crate::vehicle::Vehicle;

/// One Vehicle plus one FCC sharing an id.
///
/// The FCC is held behind its own mutex (not the vehicle's) so the physics
/// loop and the ADS-B loop can each reach it without contending on vehicle
/// state.
#[derive(Clone)]
pub struct Aircraft {
    pub vehicle: Vehicle,
    pub fcc: Arc<Mutex<Fcc>>,
    pub initial_position: Vector3<f64>,
    pub initial_target: Vector3<f64>,
    pub initial_speed: f64,
    pub initial_roll_angle: f64,
}

impl Aircraft {
    pub fn new(
        id: u32,
        position: Vector3<f64>,
        velocity: Vector3<f64>,
        target: Vector3<f64>,
        roll_angle: f64,
        size: f64,
        world_bound: f64,
    ) -> Self {
        let speed = velocity.norm();
        let vehicle = Vehicle::with_roll_angle(id, position, velocity, size, roll_angle);
        let fcc = Fcc::new(id, target, speed).with_world_bound(world_bound);
        Self {
            vehicle,
            fcc: Arc::new(Mutex::new(fcc)),
            initial_position: position,
            initial_target: target,
            initial_speed: speed,
            initial_roll_angle: roll_angle,
        }
    }

    pub fn id(&self) -> u32 {
        self.vehicle.id
    }

    /// Restore vehicle pose and FCC setpoints to their initial values, with
    /// the sole queued destination being `initial_target` again.
    pub fn reset(&mut self) {
        self.vehicle.reset();
        self.fcc.lock().expect("fcc mutex poisoned").reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_restores_initial_record_exactly() {
        let mut aircraft = Aircraft::new(
            1,
            Vector3::new(0.0, 0.0, 100.0),
            Vector3::new(0.0, 50.0, 0.0),
            Vector3::new(0.0, 5000.0, 100.0),
            0.0,
            5.0,
            50_000.0,
        );
        aircraft.vehicle.move_by(Vector3::new(0.0, 500.0, 0.0));
        {
            let mut fcc = aircraft.fcc.lock().unwrap();
            fcc.add_last_destination(Vector3::new(100.0, 100.0, 100.0), aircraft.vehicle.position)
                .unwrap();
        }
        aircraft.reset();

        assert_eq!(aircraft.vehicle.position, aircraft.initial_position);
        assert_eq!(aircraft.vehicle.distance_covered, 0.0);
        let fcc = aircraft.fcc.lock().unwrap();
        assert_eq!(fcc.destinations.len(), 1);
        assert_eq!(*fcc.destinations.front().unwrap(), aircraft.initial_target);
    }
}
