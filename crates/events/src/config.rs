//! Event bus configuration.

use std::time::Duration;

/// Environment variable overriding the slow-handler threshold, in milliseconds.
pub const SLOW_HANDLER_ENV: &str = "TRADEDESK_SLOW_HANDLER_MS";

const DEFAULT_SLOW_HANDLER_THRESHOLD: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventBusConfig {
    /// Handlers running longer than this are reported with a warning.
    /// Observability only: slow handlers are never cancelled.
    pub slow_handler_threshold: Duration,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            slow_handler_threshold: DEFAULT_SLOW_HANDLER_THRESHOLD,
        }
    }
}

impl EventBusConfig {
    /// Read overrides from the process environment, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(raw) = lookup(SLOW_HANDLER_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(ms) => config.slow_handler_threshold = Duration::from_millis(ms),
                Err(_) => tracing::warn!(
                    value = %raw,
                    "{SLOW_HANDLER_ENV} is not a number of milliseconds; using default"
                ),
            }
        }
        config
    }
}
