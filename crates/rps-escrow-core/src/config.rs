//! Deployment-time timeout policy.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ONE_DAY: u64 = 86_400;
pub const THIRTY_DAYS: u64 = 30 * ONE_DAY;

pub const MIN_TIMEOUT_VAR: &str = "RPS_MIN_TIMEOUT_SECS";
pub const MAX_TIMEOUT_VAR: &str = "RPS_MAX_TIMEOUT_SECS";
pub const REVEAL_WINDOW_VAR: &str = "RPS_REVEAL_WINDOW_SECS";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Minimum timeout {min}s exceeds maximum {max}s")]
    InvertedWindow { min: u64, max: u64 },

    #[error("Reveal window must be greater than zero")]
    ZeroRevealWindow,
}

/// Timeout policy, fixed for the lifetime of an escrow. All values are in
/// ledger seconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowConfig {
    /// Shortest timeout a challenge may be registered with
    pub min_timeout: u64,
    /// Longest timeout a challenge may be registered with
    pub max_timeout: u64,
    /// Time both parties get to reveal once a challenge is accepted
    pub reveal_window: u64,
}

impl Default for EscrowConfig {
    fn default() -> Self {
        Self {
            min_timeout: ONE_DAY,
            max_timeout: THIRTY_DAYS,
            reveal_window: ONE_DAY,
        }
    }
}

impl EscrowConfig {
    pub fn new(min_timeout: u64, max_timeout: u64, reveal_window: u64) -> Result<Self, ConfigError> {
        if min_timeout > max_timeout {
            return Err(ConfigError::InvertedWindow {
                min: min_timeout,
                max: max_timeout,
            });
        }
        if reveal_window == 0 {
            return Err(ConfigError::ZeroRevealWindow);
        }
        Ok(Self {
            min_timeout,
            max_timeout,
            reveal_window,
        })
    }

    /// Read the policy from `RPS_*` environment variables, falling back to
    /// the defaults for unset or unparseable values.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let read = |key: &str, default: u64| {
            lookup(key)
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(default)
        };

        Self::new(
            read(MIN_TIMEOUT_VAR, defaults.min_timeout),
            read(MAX_TIMEOUT_VAR, defaults.max_timeout),
            read(REVEAL_WINDOW_VAR, defaults.reveal_window),
        )
    }

    /// Is `timeout` inside the inclusive policy window?
    pub fn allows(&self, timeout: u64) -> bool {
        (self.min_timeout..=self.max_timeout).contains(&timeout)
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
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_policy() {
        let config = EscrowConfig::default();
        assert_eq!(config.min_timeout, 86_400);
        assert_eq!(config.max_timeout, 2_592_000);
        assert_eq!(config.reveal_window, 86_400);
    }

    #[test]
    fn test_window_bounds_are_inclusive() {
        let config = EscrowConfig::default();
        assert!(!config.allows(ONE_DAY - 1));
        assert!(config.allows(ONE_DAY));
        assert!(config.allows(THIRTY_DAYS));
        assert!(!config.allows(THIRTY_DAYS + 1));
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = EscrowConfig::from_lookup(lookup(&[
            (MIN_TIMEOUT_VAR, "60"),
            (MAX_TIMEOUT_VAR, "3600"),
            (REVEAL_WINDOW_VAR, "120"),
        ]))
        .unwrap();

        assert_eq!(config, EscrowConfig::new(60, 3600, 120).unwrap());
    }

    #[test]
    fn test_from_lookup_ignores_garbage() {
        let config =
            EscrowConfig::from_lookup(lookup(&[(MIN_TIMEOUT_VAR, "one day")])).unwrap();
        assert_eq!(config, EscrowConfig::default());
    }

    #[test]
    fn test_inverted_window_rejected() {
        let result = EscrowConfig::from_lookup(lookup(&[(MIN_TIMEOUT_VAR, "9999999999")]));
        assert_eq!(
            result,
            Err(ConfigError::InvertedWindow {
                min: 9_999_999_999,
                max: THIRTY_DAYS
            })
        );
    }

    #[test]
    fn test_zero_reveal_window_rejected() {
        assert_eq!(
            EscrowConfig::new(1, 2, 0),
            Err(ConfigError::ZeroRevealWindow)
        );
    }
}
