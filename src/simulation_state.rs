use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::config::AdsbConfig;

/// Process-wide shared state.
///
/// Hot scalar flags read every tick live behind plain atomics; compound
/// pause bookkeeping (which needs a read-then-write) lives behind one small
/// mutex, avoiding per-property locks for state that is mostly read.
pub struct SimulationState {
    pub is_realtime: AtomicBool,
    pub avoid_collisions: AtomicBool,
    pub override_avoid_collisions: AtomicBool,
    minimum_separation_bits: AtomicU64,
    pub physics_cycles: AtomicU64,
    pub adsb_cycles: AtomicU64,
    pub is_paused: AtomicBool,
    pub is_running: AtomicBool,
    pub reset_demanded: AtomicBool,
    pub collision: AtomicBool,
    pub first_cause_collision: AtomicBool,
    pub second_cause_collision: AtomicBool,
    pub skipped_ticks: AtomicU64,
    pause: Mutex<PauseBookkeeping>,
}

#[derive(Default)]
struct PauseBookkeeping {
    pause_start_timestamp: Option<Instant>,
    time_paused: Duration,
}

impl SimulationState {
    pub fn new(is_realtime: bool, avoid_collisions: bool, adsb_config: &AdsbConfig) -> Self {
        Self {
            is_realtime: AtomicBool::new(is_realtime),
            avoid_collisions: AtomicBool::new(avoid_collisions),
            override_avoid_collisions: AtomicBool::new(false),
            minimum_separation_bits: AtomicU64::new(adsb_config.minimum_separation.to_bits()),
            physics_cycles: AtomicU64::new(0),
            adsb_cycles: AtomicU64::new(0),
            is_paused: AtomicBool::new(false),
            is_running: AtomicBool::new(true),
            reset_demanded: AtomicBool::new(false),
            collision: AtomicBool::new(false),
            first_cause_collision: AtomicBool::new(false),
            second_cause_collision: AtomicBool::new(false),
            skipped_ticks: AtomicU64::new(0),
            pause: Mutex::new(PauseBookkeeping::default()),
        }
    }

    pub fn minimum_separation(&self) -> f64 {
        f64::from_bits(self.minimum_separation_bits.load(Ordering::Relaxed))
    }

    pub fn set_minimum_separation(&self, value: f64) {
        self.minimum_separation_bits
            .store(value.to_bits(), Ordering::Relaxed);
    }

    pub fn avoidance_active(&self) -> bool {
        self.avoid_collisions.load(Ordering::Relaxed)
            && !self.override_avoid_collisions.load(Ordering::Relaxed)
    }

    pub fn is_paused(&self) -> bool {
        self.is_paused.load(Ordering::Relaxed)
    }

    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::Relaxed)
    }

    pub fn stop(&self) {
        self.is_running.store(false, Ordering::Relaxed);
    }

    /// Record that a worker entered a paused tick at `now`. Idempotent.
    pub fn begin_pause(&self, now: Instant) {
        self.is_paused.store(true, Ordering::Relaxed);
        let mut bookkeeping = self.pause.lock().expect("pause mutex poisoned");
        if bookkeeping.pause_start_timestamp.is_none() {
            bookkeeping.pause_start_timestamp = Some(now);
        }
    }

    /// Record the end of a pause at `now`, accumulating `time_paused`.
    pub fn end_pause(&self, now: Instant) {
        self.is_paused.store(false, Ordering::Relaxed);
        let mut bookkeeping = self.pause.lock().expect("pause mutex poisoned");
        if let Some(start) = bookkeeping.pause_start_timestamp.take() {
            bookkeeping.time_paused += now.saturating_duration_since(start);
        }
    }

    pub fn time_paused(&self) -> Duration {
        self.pause.lock().expect("pause mutex poisoned").time_paused
    }

    pub fn record_clock_fault(&self) {
        self.skipped_ticks.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a collision and which aircraft's closing velocity caused it.
    pub fn register_collision(&self, first_cause: bool, second_cause: bool) {
        self.collision.store(true, Ordering::Relaxed);
        if first_cause {
            self.first_cause_collision.store(true, Ordering::Relaxed);
        }
        if second_cause {
            self.second_cause_collision.store(true, Ordering::Relaxed);
        }
    }

    pub fn collision(&self) -> bool {
        self.collision.load(Ordering::Relaxed)
    }
}
