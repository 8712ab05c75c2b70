//! Configuration Module
//!
//! Timing parameters for the demo runner, loaded from environment variables.
//! Library components take their durations as arguments and never read the
//! environment themselves.

use std::env;
use std::time::Duration;

/// Demo runner configuration.
///
/// All values are milliseconds and can be overridden via environment
/// variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Lifetime of the entry stored in the cache walkthrough
    pub cache_ttl_ms: u64,
    /// Delay of the one-shot timer
    pub timeout_delay_ms: u64,
    /// When the one-shot timer gets cancelled
    pub timeout_cancel_ms: u64,
    /// Period of the repeating timer
    pub interval_ms: u64,
    /// When the repeating timer gets cancelled
    pub interval_cancel_ms: u64,
    /// Quiet period of the debounced callback
    pub debounce_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_TTL_MS` - Cache entry lifetime (default: 1000)
    /// - `TIMEOUT_DELAY_MS` - One-shot delay (default: 20)
    /// - `TIMEOUT_CANCEL_MS` - One-shot cancellation time (default: 50)
    /// - `INTERVAL_MS` - Repeating period (default: 35)
    /// - `INTERVAL_CANCEL_MS` - Repeating cancellation time (default: 190)
    /// - `DEBOUNCE_MS` - Debounce wait (default: 50)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache_ttl_ms: env_ms("CACHE_TTL_MS", defaults.cache_ttl_ms),
            timeout_delay_ms: env_ms("TIMEOUT_DELAY_MS", defaults.timeout_delay_ms),
            timeout_cancel_ms: env_ms("TIMEOUT_CANCEL_MS", defaults.timeout_cancel_ms),
            interval_ms: env_ms("INTERVAL_MS", defaults.interval_ms),
            interval_cancel_ms: env_ms("INTERVAL_CANCEL_MS", defaults.interval_cancel_ms),
            debounce_ms: env_ms("DEBOUNCE_MS", defaults.debounce_ms),
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }

    pub fn timeout_delay(&self) -> Duration {
        Duration::from_millis(self.timeout_delay_ms)
    }

    pub fn timeout_cancel(&self) -> Duration {
        Duration::from_millis(self.timeout_cancel_ms)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn interval_cancel(&self) -> Duration {
        Duration::from_millis(self.interval_cancel_ms)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

fn env_ms(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_ttl_ms: 1000,
            timeout_delay_ms: 20,
            timeout_cancel_ms: 50,
            interval_ms: 35,
            interval_cancel_ms: 190,
            debounce_ms: 50,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.cache_ttl_ms, 1000);
        assert_eq!(config.timeout_delay_ms, 20);
        assert_eq!(config.timeout_cancel_ms, 50);
        assert_eq!(config.interval_ms, 35);
        assert_eq!(config.interval_cancel_ms, 190);
        assert_eq!(config.debounce_ms, 50);
        assert_eq!(config.interval(), Duration::from_millis(35));
    }

    #[test]
    fn test_config_from_env() {
        // Only this test touches these variables
        env::remove_var("CACHE_TTL_MS");
        env::set_var("INTERVAL_MS", "30");
        env::set_var("DEBOUNCE_MS", "not-a-number");

        let config = Config::from_env();
        assert_eq!(config.cache_ttl_ms, 1000);
        assert_eq!(config.interval_ms, 30);
        assert_eq!(config.debounce_ms, 50, "Unparseable values fall back to defaults");

        env::remove_var("INTERVAL_MS");
        env::remove_var("DEBOUNCE_MS");
    }
}
