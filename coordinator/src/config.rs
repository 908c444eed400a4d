//! Batch coordinator configuration.

use std::time::Duration;

/// Configuration for batch runs.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Interval between deadline checks while waiting for status updates.
    pub tick: Duration,
    /// Timeout applied when a batch does not specify one.
    pub default_timeout_secs: u64,
    /// Upper bound on payments per batch.
    pub max_payments: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(5),
            default_timeout_secs: 60,
            max_payments: 500,
        }
    }
}

impl BatchConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(ms) = std::env::var("LUMENBATCH_TICK_MS") {
            if let Ok(ms) = ms.parse() {
                config.tick = Duration::from_millis(ms);
            }
        }

        if let Ok(secs) = std::env::var("LUMENBATCH_DEFAULT_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse() {
                config.default_timeout_secs = secs;
            }
        }

        if let Ok(max) = std::env::var("LUMENBATCH_MAX_PAYMENTS") {
            if let Ok(max) = max.parse() {
                config.max_payments = max;
            }
        }

        config
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.tick.is_zero() {
            return Err("Tick interval cannot be zero".to_string());
        }

        if self.default_timeout_secs == 0 {
            return Err("Default timeout cannot be zero".to_string());
        }

        if self.max_payments == 0 {
            return Err("Max payments cannot be zero".to_string());
        }

        Ok(())
    }
}
