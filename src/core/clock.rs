//! Simulation clock
//!
//! Deadlines (pregnancy due times, forced-repositioning timers) are stamped
//! with `SimTime`, which only moves when the engine ticks. A paused
//! simulation therefore never lets a deadline slip past while nobody is
//! watching.

use crate::core::types::SimTime;

#[derive(Debug, Clone, Default)]
pub struct SimClock {
    /// Accumulated simulated seconds
    elapsed_secs: f64,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `dt` seconds. Negative or non-finite steps are ignored.
    pub fn advance(&mut self, dt: f64) {
        if dt.is_finite() && dt > 0.0 {
            self.elapsed_secs += dt;
        }
    }

    pub fn now(&self) -> SimTime {
        SimTime((self.elapsed_secs * 1000.0).round() as u64)
    }
}
