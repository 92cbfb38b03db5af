use nalgebra::Vector3;
use tracing_subscriber::EnvFilter;

use vigil::{AircraftInit, ScenarioRecord, ScenarioRunner, SimulationConfig};

/// Runs one built-in head-on scenario to completion and prints the
/// resulting `ScenarioResult`, with and without avoidance.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let a1 = AircraftInit {
        id: 0,
        position: Vector3::new(0.0, 0.0, 100.0),
        velocity: Vector3::new(0.0, 50.0, 0.0),
        target: Vector3::new(0.0, 5000.0, 100.0),
        roll_angle: 0.0,
    };
    let a2 = AircraftInit {
        id: 1,
        position: Vector3::new(0.0, 5000.0, 100.0),
        velocity: Vector3::new(0.0, -50.0, 0.0),
        target: Vector3::new(0.0, 0.0, 100.0),
        roll_angle: 0.0,
    };
    let record = ScenarioRecord::pair(1, a1, a2).expect("built-in scenario is well-formed");
    let runner = ScenarioRunner::new(SimulationConfig::default());

    for avoid in [false, true] {
        match runner.run_headless(&record, avoid, 120.0) {
            Ok(result) => {
                println!(
                    "avoid_collisions={avoid} collision={} min_dist={:.2} elapsed_s={:.2}",
                    result.collision, result.minimal_relative_distance, result.elapsed_s
                );
            }
            Err(e) => eprintln!("scenario failed: {e}"),
        }
    }
}
