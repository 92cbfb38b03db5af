mod common;

use std::sync::{Arc, RwLock};

use nalgebra::Vector3;
use vigil::physics_loop::PhysicsLoop;
use vigil::{AdsbConfig, Aircraft, Fcc, PhysicsConfig, SimulationState};

#[test]
fn identical_positions_at_start_report_immediate_collision() {
    let a1 = Aircraft::new(
        0,
        Vector3::new(0.0, 0.0, 100.0),
        Vector3::new(0.0, 10.0, 0.0),
        Vector3::new(0.0, 1000.0, 100.0),
        0.0,
        5.0,
        50_000.0,
    );
    let a2 = Aircraft::new(
        1,
        Vector3::new(0.0, 0.0, 100.0),
        Vector3::new(0.0, -10.0, 0.0),
        Vector3::new(0.0, -1000.0, 100.0),
        0.0,
        5.0,
        50_000.0,
    );
    let mut fleet = vec![a1, a2];

    let state = Arc::new(SimulationState::new(false, false, &AdsbConfig::default()));
    let snapshots = Arc::new(RwLock::new(Vec::new()));
    let mut physics_loop = PhysicsLoop::new(PhysicsConfig::default(), state.clone(), snapshots);

    let collided = physics_loop.step(&mut fleet).unwrap();
    assert!(collided);
    assert!(state.collision());
}

#[test]
fn exact_180_degree_heading_error_turns_right() {
    // Current heading due north (yaw 0), target due south (yaw 180):
    // the deterministic tie-break picks a positive (right) turn.
    let mut fcc = Fcc::new(0, Vector3::new(0.0, -100.0, 0.0), 50.0);
    fcc.update(Vector3::zeros(), 0.0, 5.0);
    assert!(fcc.target_roll > 0.0);
    assert!(fcc.is_turning_right);
    assert!(!fcc.is_turning_left);
}
