//! Fixed-interval driver turning wall-clock time into ticks
//!
//! The runner owns no simulation state. It only decides when the next
//! tick is due and how large its step is. Holding `&mut Environment` for
//! the whole call keeps ticks from overlapping.

use crate::core::config::SimulationConfig;
use crate::simulation::environment::Environment;
use crate::simulation::events::SimulationEvent;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct SimulationRunner {
    interval: Duration,
    max_step_secs: f64,
    last_tick: Option<Instant>,
}

impl SimulationRunner {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            interval: Duration::from_millis(config.tick_interval_ms.max(1)),
            max_step_secs: config.max_step_secs,
            last_tick: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Tick `env` if it is running and a full interval has passed since the
    /// previous tick.
    ///
    /// The first poll after a resume only stamps the time, so wall time
    /// spent paused never turns into a step.
    pub fn poll(&mut self, env: &mut Environment, now: Instant) -> Option<Vec<SimulationEvent>> {
        if !env.is_running() {
            self.last_tick = None;
            return None;
        }

        let Some(last) = self.last_tick else {
            self.last_tick = Some(now);
            return None;
        };

        let elapsed = now.saturating_duration_since(last);
        if elapsed < self.interval {
            return None;
        }

        self.last_tick = Some(now);
        let dt = elapsed.as_secs_f64().min(self.max_step_secs);
        Some(env.update(dt))
    }

    /// Poll repeatedly for `duration` of wall time, sleeping between polls.
    /// Returns the number of ticks run.
    pub fn run_for(&mut self, env: &mut Environment, duration: Duration) -> u64 {
        let start = Instant::now();
        let mut ticks = 0;
        loop {
            let now = Instant::now();
            if now.saturating_duration_since(start) >= duration {
                break;
            }
            if self.poll(env, now).is_some() {
                ticks += 1;
            }
            std::thread::sleep(self.interval);
        }
        ticks
    }
}
