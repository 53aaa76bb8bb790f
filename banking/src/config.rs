//! Configuration for the banking desk.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::money::Money;
use crate::types::AccountDefaults;
use serde::{Deserialize, Serialize};
use std::env;

/// Default tracing filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankConfig {
    /// Limits for newly opened accounts
    pub defaults: AccountDefaults,
    /// `tracing_subscriber::EnvFilter` directives
    pub log_filter: String,
}

impl BankConfig {
    /// Load configuration from the process environment
    ///
    /// - `BANKDESK_MIN_BALANCE`: savings floor (default `500`)
    /// - `BANKDESK_OVERDRAFT_LIMIT`: current-account overdraft (default `1000`)
    /// - `RUST_LOG`: log filter (default `warn`)
    ///
    /// Values that do not parse, or are negative, fall back to the default.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let fallback = AccountDefaults::default();
        let limit = |key: &str, default: Money| {
            lookup(key)
                .and_then(|s| s.parse::<Money>().ok())
                .filter(|amount| !amount.is_negative())
                .unwrap_or(default)
        };

        Self {
            defaults: AccountDefaults {
                min_balance: limit("BANKDESK_MIN_BALANCE", fallback.min_balance),
                overdraft_limit: limit("BANKDESK_OVERDRAFT_LIMIT", fallback.overdraft_limit),
            },
            log_filter: lookup("RUST_LOG")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        }
    }
}

impl Default for BankConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
