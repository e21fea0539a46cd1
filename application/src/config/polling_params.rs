//! Polling parameters: bounded wait for asynchronous agent runs.
//!
//! A hosted agent run is polled until it leaves its pending states. The wait
//! uses exponential backoff and is cut off by an overall deadline.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Backoff and deadline for polling a run to completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollingParams {
    /// Delay before the first status check.
    pub initial_delay: Duration,
    /// Upper bound for a single delay.
    pub max_delay: Duration,
    /// Growth factor applied after every attempt.
    pub multiplier: f64,
    /// Total time a run may stay pending before the turn fails.
    pub max_wait: Duration,
}

impl Default for PollingParams {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(4),
            multiplier: 2.0,
            max_wait: Duration::from_secs(120),
        }
    }
}

impl PollingParams {
    /// Delay before status check number `attempt` (0-indexed).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = self.multiplier.max(1.0).powi(attempt.min(64) as i32);
        let delay = self.initial_delay.as_secs_f64() * factor;
        Duration::from_secs_f64(delay.min(self.max_delay.as_secs_f64()))
    }

    // ==================== Builder Methods ====================

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }
}
