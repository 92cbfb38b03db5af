use thiserror::Error;

/// Errors surfaced by the simulation core.
///
/// `InvalidDestination` is recovered locally by the caller (reject, keep
/// going). `InvalidScenario` aborts the affected scenario only. `ClockFault`
/// resets the tick origin and continues, bumping the skipped-ticks counter.
/// `Cancelled` is graceful shutdown, not a failure.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("invalid scenario: {0}")]
    InvalidScenario(String),

    #[error("invalid destination: {0}")]
    InvalidDestination(String),

    #[error("clock fault: {0}")]
    ClockFault(String),

    #[error("cancelled")]
    Cancelled,

    #[error("computation error: {0}")]
    ComputationError(String),
}

pub type Result<T> = std::result::Result<T, SimError>;
