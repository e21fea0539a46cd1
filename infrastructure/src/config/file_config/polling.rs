//! Run polling configuration from TOML (`[polling]` section)

use negotia_application::PollingParams;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw polling configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePollingConfig {
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub multiplier: f64,
    /// Overall limit for one agent call
    pub max_wait_seconds: u64,
}

impl Default for FilePollingConfig {
    fn default() -> Self {
        let params = PollingParams::default();
        Self {
            initial_delay_ms: params.initial_delay.as_millis() as u64,
            max_delay_ms: params.max_delay.as_millis() as u64,
            multiplier: params.multiplier,
            max_wait_seconds: params.max_wait.as_secs(),
        }
    }
}

impl FilePollingConfig {
    pub fn to_params(&self) -> PollingParams {
        PollingParams::default()
            .with_initial_delay(Duration::from_millis(self.initial_delay_ms))
            .with_max_delay(Duration::from_millis(self.max_delay_ms))
            .with_multiplier(self.multiplier)
            .with_max_wait(Duration::from_secs(self.max_wait_seconds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_params() {
        assert_eq!(FilePollingConfig::default().to_params(), PollingParams::default());
    }

    #[test]
    fn test_to_params() {
        let config = FilePollingConfig {
            initial_delay_ms: 100,
            max_delay_ms: 1000,
            multiplier: 3.0,
            max_wait_seconds: 10,
        };
        let params = config.to_params();
        assert_eq!(params.initial_delay, Duration::from_millis(100));
        assert_eq!(params.delay_for(1), Duration::from_millis(300));
        assert_eq!(params.delay_for(5), Duration::from_secs(1));
        assert_eq!(params.max_wait, Duration::from_secs(10));
    }
}
