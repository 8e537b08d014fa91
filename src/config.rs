//! Server configuration.
//!
//! Environment-based configuration for the HTTP listener, token cookie and
//! admission scheduler.

use std::time::Duration;

use crate::queue::SchedulerConfig;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct WaitroomConfig {
    /// HTTP listener port
    pub http_port: u16,
    /// Lifetime of the token cookie set by `/touch`, in seconds
    pub token_cookie_max_age_secs: u64,
    /// Admission scheduler settings
    pub scheduler: SchedulerConfig,
}

impl Default for WaitroomConfig {
    fn default() -> Self {
        Self {
            http_port: 8080,
            token_cookie_max_age_secs: 300,
            scheduler: SchedulerConfig::default(),
        }
    }
}

impl WaitroomConfig {
    /// Create configuration from environment variables.
    ///
    /// Environment variables:
    /// - `HTTP_PORT`: HTTP listener port (default: 8080)
    /// - `TOKEN_COOKIE_MAX_AGE_SECS`: token cookie lifetime (default: 300)
    /// - `SCHEDULER_ENABLED`: run the admission scheduler (default: false)
    /// - `SCHEDULER_INITIAL_DELAY_MS`: delay before first sweep (default: 10000)
    /// - `SCHEDULER_INTERVAL_MS`: delay between sweeps (default: 5000)
    /// - `SCHEDULER_BATCH_SIZE`: users promoted per queue per sweep (default: 3)
    /// - `SCHEDULER_MAX_CONCURRENCY`: queues promoted in parallel (default: 16)
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(port) = lookup("HTTP_PORT").and_then(|v| v.parse().ok()) {
            config.http_port = port;
        }

        if let Some(secs) = lookup("TOKEN_COOKIE_MAX_AGE_SECS").and_then(|v| v.parse().ok()) {
            config.token_cookie_max_age_secs = secs;
        }

        config.scheduler.enabled = lookup("SCHEDULER_ENABLED")
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(false);

        if let Some(ms) = lookup("SCHEDULER_INITIAL_DELAY_MS").and_then(|v| v.parse().ok()) {
            config.scheduler.initial_delay = Duration::from_millis(ms);
        }

        if let Some(ms) = lookup("SCHEDULER_INTERVAL_MS").and_then(|v| v.parse().ok()) {
            config.scheduler.interval = Duration::from_millis(ms);
        }

        if let Some(n) = lookup("SCHEDULER_BATCH_SIZE").and_then(|v| v.parse().ok()) {
            config.scheduler.batch_size = n;
        }

        if let Some(n) = lookup("SCHEDULER_MAX_CONCURRENCY")
            .and_then(|v| v.parse().ok())
            .filter(|n: &usize| *n > 0)
        {
            config.scheduler.max_concurrency = n;
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = WaitroomConfig::from_lookup(lookup(&[]));
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.token_cookie_max_age_secs, 300);
        assert!(!config.scheduler.enabled);
        assert_eq!(config.scheduler.batch_size, 3);
        assert_eq!(config.scheduler.initial_delay, Duration::from_secs(10));
        assert_eq!(config.scheduler.interval, Duration::from_secs(5));
    }

    #[test]
    fn test_overrides() {
        let config = WaitroomConfig::from_lookup(lookup(&[
            ("HTTP_PORT", "9000"),
            ("SCHEDULER_ENABLED", "TRUE"),
            ("SCHEDULER_INTERVAL_MS", "250"),
            ("SCHEDULER_BATCH_SIZE", "10"),
            ("SCHEDULER_MAX_CONCURRENCY", "0"),
        ]));
        assert_eq!(config.http_port, 9000);
        assert!(config.scheduler.enabled);
        assert_eq!(config.scheduler.interval, Duration::from_millis(250));
        assert_eq!(config.scheduler.batch_size, 10);
        assert_eq!(config.scheduler.max_concurrency, 16);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = WaitroomConfig::from_lookup(lookup(&[
            ("HTTP_PORT", "not-a-port"),
            ("SCHEDULER_ENABLED", "yes"),
        ]));
        assert_eq!(config.http_port, 8080);
        assert!(!config.scheduler.enabled);
    }
}
