pub mod adsb_loop;
pub mod aircraft;
pub mod clock;
pub mod config;
pub mod constants;
pub mod errors;
pub mod fcc;
pub mod math;
pub mod physics_loop;
pub mod scenario;
pub mod simulation_state;
pub mod telemetry;
pub mod vehicle;

pub use aircraft::Aircraft;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AdsbConfig, PhysicsConfig, SimulationConfig};
pub use errors::{Result, SimError};
pub use fcc::Fcc;
pub use scenario::{AircraftInit, ScenarioRecord, ScenarioResult, ScenarioRunner};
pub use simulation_state::SimulationState;
pub use telemetry::{TelemetryCallback, TelemetryEvent};
pub use vehicle::Vehicle;
