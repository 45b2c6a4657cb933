//! Scheduler configuration.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration as StdDuration;

use chrono::Duration;

/// Errors from reading configuration out of the environment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is not a valid socket address: {value:?}")]
    InvalidAddr { var: &'static str, value: String },

    #[error("{var} must be a positive number of seconds, got {value:?}")]
    InvalidInterval { var: &'static str, value: String },
}

/// Configuration parameters for the scheduler and its server.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Days added to a start date before aligning the first occurrence.
    pub first_occurrence_lead_days: i64,

    /// Minimum notice (days) for booking or cancelling a one-time pickup.
    pub cancel_limit_days: u32,

    /// How often the batch advance runs (seconds).
    pub advance_interval_secs: u64,

    /// Address the HTTP server binds to.
    pub bind_addr: SocketAddr,

    /// Optional JSON file with vehicles, employees, customers and weekday rules.
    pub seed_path: Option<PathBuf>,
}

impl SchedulerConfig {
    pub const BIND_VAR: &'static str = "SCHEDULER_BIND";
    pub const SEED_VAR: &'static str = "SCHEDULER_SEED";
    pub const ADVANCE_VAR: &'static str = "SCHEDULER_ADVANCE_SECS";

    /// Create a new configuration with the given parameters.
    pub fn new(
        first_occurrence_lead_days: i64,
        cancel_limit_days: u32,
        advance_interval_secs: u64,
        bind_addr: SocketAddr,
        seed_path: Option<PathBuf>,
    ) -> Self {
        Self {
            first_occurrence_lead_days,
            cancel_limit_days,
            advance_interval_secs,
            bind_addr,
            seed_path,
        }
    }

    /// Defaults overridden by whatever is set in the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Defaults overridden by `lookup`, which maps a variable name to its value.
    pub fn from_lookup(
        lookup: impl Fn(&'static str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup(Self::BIND_VAR) {
            config.bind_addr = value.parse().map_err(|_| ConfigError::InvalidAddr {
                var: Self::BIND_VAR,
                value,
            })?;
        }

        if let Some(value) = lookup(Self::SEED_VAR) {
            if !value.is_empty() {
                config.seed_path = Some(PathBuf::from(value));
            }
        }

        if let Some(value) = lookup(Self::ADVANCE_VAR) {
            config.advance_interval_secs = match value.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::InvalidInterval {
                        var: Self::ADVANCE_VAR,
                        value,
                    });
                }
            };
        }

        Ok(config)
    }

    /// Returns the first-occurrence lead time as a Duration.
    pub fn first_occurrence_lead(&self) -> Duration {
        Duration::days(self.first_occurrence_lead_days)
    }

    /// Returns the one-time cancel limit as a Duration.
    pub fn cancel_limit(&self) -> Duration {
        Duration::days(i64::from(self.cancel_limit_days))
    }

    /// Returns the batch advance period, for use with `tokio::time::interval`.
    pub fn advance_interval(&self) -> StdDuration {
        StdDuration::from_secs(self.advance_interval_secs)
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            first_occurrence_lead_days: 2,
            cancel_limit_days: 2,
            advance_interval_secs: 86_400, // daily
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            seed_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&'static str, &str)]) -> impl Fn(&'static str) -> Option<String> {
        let map: HashMap<&'static str, String> =
            pairs.iter().map(|(k, v)| (*k, v.to_string())).collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn default_config() {
        let config = SchedulerConfig::default();

        assert_eq!(config.first_occurrence_lead_days, 2);
        assert_eq!(config.cancel_limit_days, 2);
        assert_eq!(config.advance_interval_secs, 86_400);
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:3000");
        assert!(config.seed_path.is_none());
    }

    #[test]
    fn duration_methods() {
        let config = SchedulerConfig::default();

        assert_eq!(config.first_occurrence_lead(), Duration::days(2));
        assert_eq!(config.cancel_limit(), Duration::days(2));
        assert_eq!(config.advance_interval(), StdDuration::from_secs(86_400));
    }

    #[test]
    fn custom_config() {
        let addr: SocketAddr = "0.0.0.0:8080".parse().unwrap();
        let config = SchedulerConfig::new(3, 5, 60, addr, Some("seed.json".into()));

        assert_eq!(config.first_occurrence_lead_days, 3);
        assert_eq!(config.cancel_limit_days, 5);
        assert_eq!(config.advance_interval_secs, 60);
        assert_eq!(config.bind_addr, addr);
        assert_eq!(config.seed_path, Some(PathBuf::from("seed.json")));
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = SchedulerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:3000");
        assert_eq!(config.advance_interval_secs, 86_400);
    }

    #[test]
    fn environment_overrides() {
        let config = SchedulerConfig::from_lookup(lookup(&[
            ("SCHEDULER_BIND", "0.0.0.0:9000"),
            ("SCHEDULER_SEED", "/data/seed.json"),
            ("SCHEDULER_ADVANCE_SECS", "3600"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:9000");
        assert_eq!(config.seed_path, Some(PathBuf::from("/data/seed.json")));
        assert_eq!(config.advance_interval_secs, 3600);
    }

    #[test]
    fn empty_seed_var_means_no_seed() {
        let config = SchedulerConfig::from_lookup(lookup(&[("SCHEDULER_SEED", "")])).unwrap();
        assert!(config.seed_path.is_none());
    }

    #[test]
    fn malformed_values_rejected() {
        let err = SchedulerConfig::from_lookup(lookup(&[("SCHEDULER_BIND", "localhost")]));
        assert!(matches!(err, Err(ConfigError::InvalidAddr { .. })));

        let err = SchedulerConfig::from_lookup(lookup(&[("SCHEDULER_ADVANCE_SECS", "0")]));
        assert!(matches!(err, Err(ConfigError::InvalidInterval { .. })));

        let err = SchedulerConfig::from_lookup(lookup(&[("SCHEDULER_ADVANCE_SECS", "soon")]));
        assert!(matches!(err, Err(ConfigError::InvalidInterval { .. })));
    }
}
