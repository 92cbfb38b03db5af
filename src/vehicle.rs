use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::constants::MAX_ROLL_DEG;

/// Pose, velocity and size of a single aircraft body.
///
/// A pure state container: `move_by`/`roll` are the only mutators, and both
/// are guarded (roll is clamped to the envelope; distance covered is always
/// non-decreasing). No autonomous behavior lives here — setpoints come from
/// [`crate::fcc::Fcc`] and are applied by [`crate::physics_loop::PhysicsLoop`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: u32,
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    pub size: f64,
    pub roll_angle: f64,
    pub initial_position: Vector3<f64>,
    pub initial_velocity: Vector3<f64>,
    pub initial_roll_angle: f64,
    pub distance_covered: f64,
}

impl Vehicle {
    pub fn new(id: u32, position: Vector3<f64>, velocity: Vector3<f64>, size: f64) -> Self {
        Self::with_roll_angle(id, position, velocity, size, 0.0)
    }

    pub fn with_roll_angle(
        id: u32,
        position: Vector3<f64>,
        velocity: Vector3<f64>,
        size: f64,
        roll_angle: f64,
    ) -> Self {
        let roll_angle = roll_angle.clamp(-MAX_ROLL_DEG, MAX_ROLL_DEG);
        Self {
            id,
            position,
            velocity,
            size,
            roll_angle,
            initial_position: position,
            initial_velocity: velocity,
            initial_roll_angle: roll_angle,
            distance_covered: 0.0,
        }
    }

    /// Translate the vehicle by `(dx, dy, dz)`, accumulating distance covered.
    pub fn move_by(&mut self, delta: Vector3<f64>) {
        self.position += delta;
        self.distance_covered += delta.norm();
    }

    /// Roll by `delta_deg`, clamped to `[-90, +90]`.
    pub fn roll(&mut self, delta_deg: f64) {
        self.roll_angle = (self.roll_angle + delta_deg).clamp(-MAX_ROLL_DEG, MAX_ROLL_DEG);
    }

    /// Restore the vehicle to its initial pose. `distance_covered` resets to zero.
    pub fn reset(&mut self) {
        self.position = self.initial_position;
        self.velocity = self.initial_velocity;
        self.roll_angle = self.initial_roll_angle;
        self.distance_covered = 0.0;
    }

    pub fn speed(&self) -> f64 {
        self.velocity.norm()
    }
}
