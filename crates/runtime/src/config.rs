//! Centralized configuration for the solar catalog client
//!
//! This module provides a single source of truth for all configuration values
//! used when talking to the catalog backend. Values are resolved once at
//! startup and never change afterwards.
//!
//! # Environment Variables
//!
//! The following environment variables can be used to override defaults:
//! - `SOLAR_API_URL`: Override the default backend API URL
//! - `SOLAR_API_TIMEOUT_MS`: Per-attempt request deadline in milliseconds
//! - `SOLAR_API_RETRIES`: Maximum number of attempts per request
//! - `SOLAR_API_RETRY_DELAY_MS`: Fixed delay between attempts in milliseconds
//! - `SOLAR_FEATURE_SEARCH`, `SOLAR_FEATURE_CATEGORIES`,
//!   `SOLAR_FEATURE_ADMIN_PANEL`, `SOLAR_FEATURE_REAL_TIME_UPDATES`: feature flags
//! - `SOLAR_DEBUG`: Enable debug logging of the resolved configuration
//! - `SOLAR_AUTH_TOKEN`: Provide an authentication token

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default backend API base URL
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5001";

/// Environment variable name for overriding the API URL
pub const API_URL_ENV_VAR: &str = "SOLAR_API_URL";

/// Environment variable name for the per-attempt timeout
pub const API_TIMEOUT_ENV_VAR: &str = "SOLAR_API_TIMEOUT_MS";

/// Environment variable name for the attempt count
pub const API_RETRIES_ENV_VAR: &str = "SOLAR_API_RETRIES";

/// Environment variable name for the delay between attempts
pub const API_RETRY_DELAY_ENV_VAR: &str = "SOLAR_API_RETRY_DELAY_MS";

/// Environment variable name for debug configuration logging
pub const DEBUG_ENV_VAR: &str = "SOLAR_DEBUG";

/// Environment variable name for the auth token
pub const AUTH_TOKEN_ENV_VAR: &str = "SOLAR_AUTH_TOKEN";

/// Default API timeout in milliseconds
pub const DEFAULT_API_TIMEOUT_MS: u64 = 10_000;

/// Default number of attempts per request
pub const DEFAULT_API_RETRIES: u32 = 3;

/// Default delay between attempts in milliseconds
pub const DEFAULT_API_RETRY_DELAY_MS: u64 = 1_000;

/// Feature toggles for the catalog surfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureFlags {
    /// Free-text product search
    pub search: bool,
    /// Category browsing and management
    pub categories: bool,
    /// Admin commands (create, update, delete, dashboard)
    pub admin_panel: bool,
    /// Push updates from the backend; reserved, off by default
    pub real_time_updates: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            search: true,
            categories: true,
            admin_panel: true,
            real_time_updates: false,
        }
    }
}

/// Optional overrides, typically read from the `[api]` section of the config file
///
/// Every field left as `None` keeps the value from the layer below.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiOverrides {
    /// Backend base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Per-attempt timeout in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    /// Maximum attempts per request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retries: Option<u32>,
    /// Delay between attempts in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_delay_ms: Option<u64>,
    /// Feature flag overrides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<FeatureFlags>,
}

/// Resolved, immutable client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Backend base URL without a trailing slash
    pub base_url: String,
    /// Hard deadline for a single request attempt
    pub timeout: Duration,
    /// Maximum number of attempts for a retryable request (at least 1)
    pub retries: u32,
    /// Fixed delay between attempts
    pub retry_delay: Duration,
    /// Feature toggles
    pub features: FeatureFlags,
    /// Whether the resolved configuration is logged at startup
    pub debug_logs: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_millis(DEFAULT_API_TIMEOUT_MS),
            retries: DEFAULT_API_RETRIES,
            retry_delay: Duration::from_millis(DEFAULT_API_RETRY_DELAY_MS),
            features: FeatureFlags::default(),
            debug_logs: false,
        }
    }
}

impl ApiConfig {
    /// Resolve the configuration from the process environment
    pub fn resolve() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve from the process environment on top of file overrides
    pub fn resolve_with(overrides: &ApiOverrides) -> Self {
        Self::resolve_with_lookup(overrides, |key| std::env::var(key).ok())
    }

    /// Apply file overrides, then let `lookup` override them
    pub fn resolve_with_lookup<F>(overrides: &ApiOverrides, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        config.apply(overrides);
        config.apply_lookup(lookup);
        config
    }

    /// Resolve using an arbitrary key lookup instead of the process environment
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        config.apply_lookup(lookup);
        config
    }

    /// Apply file-level overrides
    pub fn apply(&mut self, overrides: &ApiOverrides) {
        if let Some(url) = &overrides.base_url {
            self.set_base_url(url);
        }
        if let Some(ms) = overrides.timeout_ms {
            self.timeout = Duration::from_millis(ms);
        }
        if let Some(retries) = overrides.retries {
            self.retries = retries.max(1);
        }
        if let Some(ms) = overrides.retry_delay_ms {
            self.retry_delay = Duration::from_millis(ms);
        }
        if let Some(features) = overrides.features {
            self.features = features;
        }
    }

    fn apply_lookup<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(url) = lookup(API_URL_ENV_VAR) {
            self.set_base_url(&url);
        }
        if let Some(ms) = parse_var::<u64>(API_TIMEOUT_ENV_VAR, lookup(API_TIMEOUT_ENV_VAR)) {
            self.timeout = Duration::from_millis(ms);
        }
        if let Some(retries) = parse_var::<u32>(API_RETRIES_ENV_VAR, lookup(API_RETRIES_ENV_VAR)) {
            self.retries = retries.max(1);
        }
        if let Some(ms) = parse_var::<u64>(
            API_RETRY_DELAY_ENV_VAR,
            lookup(API_RETRY_DELAY_ENV_VAR),
        ) {
            self.retry_delay = Duration::from_millis(ms);
        }

        let flags = &mut self.features;
        for (key, flag) in [
            ("SOLAR_FEATURE_SEARCH", &mut flags.search),
            ("SOLAR_FEATURE_CATEGORIES", &mut flags.categories),
            ("SOLAR_FEATURE_ADMIN_PANEL", &mut flags.admin_panel),
            ("SOLAR_FEATURE_REAL_TIME_UPDATES", &mut flags.real_time_updates),
        ] {
            if let Some(value) = parse_flag(key, lookup(key)) {
                *flag = value;
            }
        }

        if let Some(value) = parse_flag(DEBUG_ENV_VAR, lookup(DEBUG_ENV_VAR)) {
            self.debug_logs = value;
        }
    }

    fn set_base_url(&mut self, url: &str) {
        self.base_url = url.trim().trim_end_matches('/').to_string();
    }

    /// Log the resolved configuration when debug logging is enabled
    pub fn log_config(&self) {
        if self.debug_logs {
            tracing::debug!(
                base_url = %self.base_url,
                timeout_ms = self.timeout.as_millis() as u64,
                retries = self.retries,
                retry_delay_ms = self.retry_delay.as_millis() as u64,
                features = ?self.features,
                "Resolved API configuration"
            );
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, raw: Option<String>) -> Option<T> {
    let raw = raw?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(%key, value = %raw, "Ignoring unparseable configuration value");
            None
        }
    }
}

fn parse_flag(key: &str, raw: Option<String>) -> Option<bool> {
    let raw = raw?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => {
            tracing::warn!(%key, value = %raw, "Ignoring unparseable feature flag");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let config = ApiConfig::from_lookup(lookup(&[]));

        assert_eq!(config.base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.retries, 3);
        assert_eq!(config.retry_delay, Duration::from_secs(1));
        assert_eq!(config.features, FeatureFlags::default());
        assert!(!config.debug_logs);
    }

    #[test]
    fn test_environment_overrides() {
        let config = ApiConfig::from_lookup(lookup(&[
            (API_URL_ENV_VAR, "https://api.example.com/"),
            (API_TIMEOUT_ENV_VAR, "2500"),
            (API_RETRIES_ENV_VAR, "5"),
            (API_RETRY_DELAY_ENV_VAR, "20"),
            ("SOLAR_FEATURE_SEARCH", "off"),
            ("SOLAR_FEATURE_REAL_TIME_UPDATES", "true"),
            (DEBUG_ENV_VAR, "1"),
        ]));

        assert_eq!(config.base_url, "https://api.example.com");
        assert_eq!(config.timeout, Duration::from_millis(2500));
        assert_eq!(config.retries, 5);
        assert_eq!(config.retry_delay, Duration::from_millis(20));
        assert!(!config.features.search);
        assert!(config.features.real_time_updates);
        assert!(config.features.categories);
        assert!(config.debug_logs);
    }

    #[test]
    fn test_invalid_values_fall_back_to_defaults() {
        let config = ApiConfig::from_lookup(lookup(&[
            (API_URL_ENV_VAR, "   "),
            (API_TIMEOUT_ENV_VAR, "soon"),
            (API_RETRIES_ENV_VAR, "-1"),
            ("SOLAR_FEATURE_CATEGORIES", "maybe"),
        ]));

        assert_eq!(config.base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.timeout, Duration::from_millis(DEFAULT_API_TIMEOUT_MS));
        assert_eq!(config.retries, DEFAULT_API_RETRIES);
        assert!(config.features.categories);
    }

    #[test]
    fn test_zero_retries_is_clamped_to_one_attempt() {
        let config = ApiConfig::from_lookup(lookup(&[(API_RETRIES_ENV_VAR, "0")]));
        assert_eq!(config.retries, 1);
    }

    #[test]
    fn test_file_overrides_sit_below_environment() {
        let overrides = ApiOverrides {
            base_url: Some("https://file.example.com".to_string()),
            timeout_ms: Some(3000),
            retries: Some(4),
            ..ApiOverrides::default()
        };

        let config =
            ApiConfig::resolve_with_lookup(&overrides, lookup(&[(API_RETRIES_ENV_VAR, "2")]));

        assert_eq!(config.base_url, "https://file.example.com");
        assert_eq!(config.timeout, Duration::from_millis(3000));
        assert_eq!(config.retries, 2);
    }
}
