//! Free-function angle and vector helpers shared by the FCC and the physics
//! and ADS-B loops, in the style of `utils::math`'s `deg_to_rad`/`rad_to_deg`.

use nalgebra::Vector3;
use std::f64::consts::PI;

/// Convert degrees to radians.
#[inline]
pub fn deg_to_rad(deg: f64) -> f64 {
    deg * PI / 180.0
}

/// Convert radians to degrees.
#[inline]
pub fn rad_to_deg(rad: f64) -> f64 {
    rad * 180.0 / PI
}

/// Normalize an angle in degrees to `[0, 360)`.
pub fn normalize_angle(deg: f64) -> f64 {
    let wrapped = deg % 360.0;
    if wrapped < 0.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

/// Normalize a yaw delta in degrees to `(-180, 180]`, the signed heading
/// error convention used to pick a turn direction.
pub fn format_yaw_angle(deg: f64) -> f64 {
    let normalized = normalize_angle(deg);
    if normalized > 180.0 {
        normalized - 360.0
    } else {
        normalized
    }
}

/// Compass-style yaw (0 deg = +Y/north, increasing toward +X/east) of a
/// horizontal delta, normalized to `[0, 360)`.
pub fn yaw_of(dx: f64, dy: f64) -> f64 {
    normalize_angle(rad_to_deg(dx.atan2(dy)))
}

/// Pitch angle in degrees of a delta vector, clamped to `[-max_pitch, max_pitch]`.
pub fn pitch_of(dz: f64, horizontal_distance: f64, max_pitch: f64) -> f64 {
    rad_to_deg(dz.atan2(horizontal_distance)).clamp(-max_pitch, max_pitch)
}

/// Build a unit-speed velocity vector from speed, yaw and pitch (all in the
/// same convention as [`yaw_of`]/[`pitch_of`]).
pub fn velocity_from_speed_yaw_pitch(speed: f64, yaw_deg: f64, pitch_deg: f64) -> Vector3<f64> {
    let yaw = deg_to_rad(yaw_deg);
    let pitch = deg_to_rad(pitch_deg);
    Vector3::new(
        speed * pitch.cos() * yaw.sin(),
        speed * pitch.cos() * yaw.cos(),
        speed * pitch.sin(),
    )
}

/// A unit vector perpendicular to `v`'s horizontal (X/Y) component, used to
/// pick a deterministic avoidance direction when the miss distance is
/// exactly zero. Falls back to +X when `v` has no horizontal component.
pub fn horizontal_perpendicular(v: Vector3<f64>) -> Vector3<f64> {
    let horizontal = Vector3::new(-v.y, v.x, 0.0);
    let norm = horizontal.norm();
    if norm < 1e-9 {
        Vector3::new(1.0, 0.0, 0.0)
    } else {
        horizontal / norm
    }
}

/// Step `current` toward `target` by at most `max_delta`, modelling a
/// bounded-rate (angular-inertia or acceleration-limited) approach.
pub fn rate_limited_approach(current: f64, target: f64, max_delta: f64) -> f64 {
    let diff = target - current;
    if diff.abs() <= max_delta {
        target
    } else {
        current + max_delta * diff.signum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_angle_wraps_into_range() {
        assert!((normalize_angle(370.0) - 10.0).abs() < 1e-9);
        assert!((normalize_angle(-10.0) - 350.0).abs() < 1e-9);
        assert!((normalize_angle(0.0) - 0.0).abs() < 1e-9);
    }

    #[test]
    fn normalize_angle_is_idempotent() {
        for a in [-725.0, -1.0, 0.0, 180.0, 359.9, 720.5] {
            let once = normalize_angle(a);
            let twice = normalize_angle(once);
            assert!((once - twice).abs() < 1e-9);
        }
    }

    #[test]
    fn format_yaw_angle_is_idempotent() {
        for a in [-725.0, -181.0, -1.0, 0.0, 180.0, 181.0, 720.5] {
            let once = format_yaw_angle(a);
            let twice = format_yaw_angle(once);
            assert!((once - twice).abs() < 1e-9);
            assert!(once > -180.0 && once <= 180.0);
        }
    }

    #[test]
    fn format_yaw_angle_picks_positive_on_exact_180() {
        // Deterministic right-turn convention on the +/-180 boundary.
        assert!((format_yaw_angle(180.0) - 180.0).abs() < 1e-9);
        assert!((format_yaw_angle(-180.0) - 180.0).abs() < 1e-9);
    }

    #[test]
    fn rate_limited_approach_clamps_to_max_delta() {
        assert_eq!(rate_limited_approach(0.0, 100.0, 10.0), 10.0);
        assert_eq!(rate_limited_approach(95.0, 100.0, 10.0), 100.0);
        assert_eq!(rate_limited_approach(5.0, -100.0, 10.0), -5.0);
    }

    #[test]
    fn horizontal_perpendicular_is_orthogonal_and_unit() {
        let v = Vector3::new(3.0, 4.0, 10.0);
        let perp = horizontal_perpendicular(v);
        assert!((perp.norm() - 1.0).abs() < 1e-9);
        assert!((perp.x * v.x + perp.y * v.y).abs() < 1e-9);
        assert!((perp.z).abs() < 1e-12);
    }

    #[test]
    fn yaw_of_matches_compass_convention() {
        // due north
        assert!((yaw_of(0.0, 10.0) - 0.0).abs() < 1e-9);
        // due east
        assert!((yaw_of(10.0, 0.0) - 90.0).abs() < 1e-9);
        // due south
        assert!((yaw_of(0.0, -10.0) - 180.0).abs() < 1e-9);
        // due west
        assert!((yaw_of(-10.0, 0.0) - 270.0).abs() < 1e-9);
    }
}
