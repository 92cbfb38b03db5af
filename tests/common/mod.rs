use nalgebra::Vector3;
use vigil::{AircraftInit, ScenarioRecord};

pub fn aircraft(id: u32, position: Vector3<f64>, velocity: Vector3<f64>, target: Vector3<f64>) -> AircraftInit {
    AircraftInit {
        id,
        position,
        velocity,
        target,
        roll_angle: 0.0,
    }
}

/// Scenario 1 from the end-to-end property list: two aircraft closing
/// head-on at equal speed along the same track.
pub fn head_on_equal_speed() -> ScenarioRecord {
    let a1 = aircraft(
        0,
        Vector3::new(0.0, 0.0, 100.0),
        Vector3::new(0.0, 50.0, 0.0),
        Vector3::new(0.0, 5000.0, 100.0),
    );
    let a2 = aircraft(
        1,
        Vector3::new(0.0, 5000.0, 100.0),
        Vector3::new(0.0, -50.0, 0.0),
        Vector3::new(0.0, 0.0, 100.0),
    );
    ScenarioRecord::pair(1, a1, a2).expect("fixture is well-formed")
}

/// Scenario 2: trailing aircraft catching up to a slower leader.
pub fn trailing_catch_up() -> ScenarioRecord {
    let a1 = aircraft(
        0,
        Vector3::new(0.0, 0.0, 100.0),
        Vector3::new(0.0, 60.0, 0.0),
        Vector3::new(0.0, 50_000.0, 100.0),
    );
    let a2 = aircraft(
        1,
        Vector3::new(0.0, 500.0, 100.0),
        Vector3::new(0.0, 40.0, 0.0),
        Vector3::new(0.0, 50_000.0, 100.0),
    );
    ScenarioRecord::pair(2, a1, a2).expect("fixture is well-formed")
}

/// Scenario 3: oblique 45-degree crossing.
pub fn oblique_45_degrees() -> ScenarioRecord {
    let a1 = aircraft(
        0,
        Vector3::new(0.0, 0.0, 100.0),
        Vector3::new(0.0, 50.0, 0.0),
        Vector3::new(0.0, 50_000.0, 100.0),
    );
    let a2 = aircraft(
        1,
        Vector3::new(3500.0, 3500.0, 100.0),
        Vector3::new(-35.36, -35.36, 0.0),
        Vector3::new(-50_000.0, -50_000.0, 100.0),
    );
    ScenarioRecord::pair(3, a1, a2).expect("fixture is well-formed")
}

/// Scenario 4: climb/descent crossing.
pub fn climb_descent_crossing() -> ScenarioRecord {
    let a1 = aircraft(
        0,
        Vector3::new(0.0, 0.0, 50.0),
        Vector3::new(0.0, 50.0, 5.0),
        Vector3::new(0.0, 5000.0, 300.0),
    );
    let a2 = aircraft(
        1,
        Vector3::new(0.0, 5000.0, 150.0),
        Vector3::new(0.0, -50.0, -5.0),
        Vector3::new(0.0, 0.0, -50.0),
    );
    ScenarioRecord::pair(4, a1, a2).expect("fixture is well-formed")
}

/// Scenario 5: parallel tracks, never in conflict.
pub fn no_conflict_parallel() -> ScenarioRecord {
    let a1 = aircraft(
        0,
        Vector3::new(0.0, 0.0, 100.0),
        Vector3::new(0.0, 50.0, 0.0),
        Vector3::new(0.0, 5000.0, 100.0),
    );
    let a2 = aircraft(
        1,
        Vector3::new(200.0, 0.0, 100.0),
        Vector3::new(0.0, 50.0, 0.0),
        Vector3::new(200.0, 5000.0, 100.0),
    );
    ScenarioRecord::pair(5, a1, a2).expect("fixture is well-formed")
}

/// Scenario 7: a third aircraft on a near-identical track to the second,
/// so the first aircraft is in conflict with both simultaneously in the
/// same ADS-B cycle. Exercises the three-aircraft multi-conflict
/// resolution path rather than just the pairwise two-aircraft one.
pub fn three_aircraft_double_conflict() -> ScenarioRecord {
    let a0 = aircraft(
        0,
        Vector3::new(0.0, 0.0, 100.0),
        Vector3::new(0.0, 50.0, 0.0),
        Vector3::new(0.0, 5000.0, 100.0),
    );
    let a1 = aircraft(
        1,
        Vector3::new(0.0, 5000.0, 100.0),
        Vector3::new(0.0, -50.0, 0.0),
        Vector3::new(0.0, 0.0, 100.0),
    );
    // Near-identical track to a1: close enough to also conflict with a0,
    // but a1-vs-a2 relative velocity is ~0 so that pair is never a conflict.
    let a2 = aircraft(
        2,
        Vector3::new(0.1, 5000.0, 100.0),
        Vector3::new(0.0, -50.0, 0.0),
        Vector3::new(0.1, 0.0, 100.0),
    );
    ScenarioRecord::triple(6, a0, a1, a2).expect("fixture is well-formed")
}
