use nalgebra::Vector3;
use std::sync::Arc;

/// Observer events emitted at tick boundaries by the physics and ADS-B
/// loops. Plain callbacks, not signal/slot plumbing — the simulation core
/// stays unaware of whatever UI or logging consumes these.
#[derive(Debug, Clone)]
pub enum TelemetryEvent {
    PhysicsTick {
        cycle: u64,
        positions: Vec<Vector3<f64>>,
    },
    AdsbCycle {
        cycle: u64,
        minimal_relative_distance: f64,
    },
    ConflictDetected {
        first_id: u32,
        second_id: u32,
        miss_distance: f64,
        time_to_closest_approach: f64,
    },
    ManeuverApplied {
        aircraft_id: u32,
    },
    CollisionDetected {
        first_id: u32,
        second_id: u32,
        head_on: bool,
    },
}

pub type TelemetryCallback = dyn Fn(&TelemetryEvent) + Send + Sync;

pub fn emit(callback: &Option<Arc<TelemetryCallback>>, event: TelemetryEvent) {
    if let Some(cb) = callback {
        cb(&event);
    }
}
