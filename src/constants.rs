//! Default physical and timing constants for the simulation.
//!
//! These are the defaults consumed by [`crate::config::SimulationConfig`];
//! individual scenarios may override any of them — physics/ADS-B rate is a
//! scenario parameter, not a hardwired constant.

/// Standard gravity [m/s^2].
pub const GRAVITY: f64 = 9.81;

/// Default physics integrator rate [Hz].
pub const DEFAULT_PHYSICS_RATE_HZ: f64 = 100.0;

/// Default ADS-B observer rate [Hz].
pub const DEFAULT_ADSB_RATE_HZ: f64 = 1.0;

/// Time for a full 90 degree roll sweep at the default roll rate [ms].
pub const DEFAULT_ROLL_DYNAMIC_DELAY_MS: f64 = 1000.0;

/// Time for a full 45 degree pitch sweep at the default pitch rate [ms].
pub const DEFAULT_PITCH_DYNAMIC_DELAY_MS: f64 = 2000.0;

/// Maximum longitudinal acceleration magnitude [m/s^2].
pub const MAX_ACCELERATION: f64 = 2.0;

/// Default vehicle collision-sphere radius [m].
pub const DEFAULT_VEHICLE_SIZE: f64 = 5.0;

/// Default ADS-B safe-zone radius [m].
pub const DEFAULT_MINIMUM_SEPARATION: f64 = 50.0;

/// Default closest-approach time horizon beyond which a conjunction is ignored [s].
pub const DEFAULT_HORIZON_S: f64 = 30.0;

/// Roll angle envelope, symmetric about zero [deg].
pub const MAX_ROLL_DEG: f64 = 90.0;

/// Pitch angle envelope, symmetric about zero [deg].
pub const MAX_PITCH_DEG: f64 = 45.0;

/// World bound used to snap out-of-range destination components (m).
pub const DEFAULT_WORLD_BOUND: f64 = 50_000.0;
