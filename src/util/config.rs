//! Runtime configuration: built-in defaults, then the saved settings file,
//! then `FLEET_WATCH_*` environment variables.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::{
    domain::{FilterBarConfig, TableConfig},
    util::persistence::load_settings,
};

pub const ENV_API_URL: &str = "FLEET_WATCH_API_URL";
pub const ENV_DEFECTS_URL: &str = "FLEET_WATCH_DEFECTS_URL";
pub const ENV_TIMEOUT_SECS: &str = "FLEET_WATCH_TIMEOUT_SECS";

const DEFAULT_API_URL: &str = "http://localhost:3000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const MAX_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field} is not a valid http(s) URL: {value}")]
    InvalidUrl { field: &'static str, value: String },
    #[error("request timeout must be between 1 and 300 seconds, got {0}")]
    InvalidTimeout(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub defects_base_url: String,
    pub request_timeout_secs: u64,
    pub table: TableConfig,
    pub filters: FilterBarConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            defects_base_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            table: TableConfig::default(),
            filters: FilterBarConfig::default(),
        }
    }
}

impl AppConfig {
    /// Resolves the effective configuration. A broken layer is logged and
    /// skipped rather than aborting start-up.
    pub fn load() -> Self {
        let mut config = match load_settings() {
            Some(saved) => match saved.validate() {
                Ok(()) => saved,
                Err(err) => {
                    tracing::warn!(error = %err, "ignoring saved settings");
                    AppConfig::default()
                }
            },
            None => AppConfig::default(),
        };

        if let Err(err) = config.apply_env(|key| std::env::var(key).ok()) {
            tracing::warn!(error = %err, "ignoring invalid environment override");
        }
        tracing::info!(
            api = %config.api_base_url,
            defects = %config.defects_base_url,
            timeout_secs = config.request_timeout_secs,
            "configuration resolved"
        );
        config
    }

    /// Applies overrides from `lookup`. Nothing is changed when any
    /// override is invalid.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut next = self.clone();
        if let Some(url) = lookup(ENV_API_URL) {
            next.api_base_url = url.trim().to_string();
        }
        if let Some(url) = lookup(ENV_DEFECTS_URL) {
            next.defects_base_url = url.trim().to_string();
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            next.request_timeout_secs = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?;
        }
        next.validate()?;
        *self = next;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_url("API base URL", &self.api_base_url)?;
        check_url("defects base URL", &self.defects_base_url)?;
        if !(1..=MAX_TIMEOUT_SECS).contains(&self.request_timeout_secs) {
            return Err(ConfigError::InvalidTimeout(
                self.request_timeout_secs.to_string(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.clamp(1, MAX_TIMEOUT_SECS))
    }
}

fn check_url(field: &'static str, value: &str) -> Result<(), ConfigError> {
    match Url::parse(value.trim()) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        _ => Err(ConfigError::InvalidUrl {
            field,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.table.virtualize_threshold, 100);
        assert!(config.filters.ports && !config.filters.docs);
    }

    #[test]
    fn environment_overrides_saved_values() {
        let mut config = AppConfig {
            api_base_url: "http://saved:3000".into(),
            ..AppConfig::default()
        };
        config
            .apply_env(env(&[
                (ENV_API_URL, " https://fleet.example.com/api-root "),
                (ENV_TIMEOUT_SECS, "12"),
            ]))
            .unwrap();
        assert_eq!(config.api_base_url, "https://fleet.example.com/api-root");
        assert_eq!(config.defects_base_url, DEFAULT_API_URL);
        assert_eq!(config.request_timeout_secs, 12);
    }

    #[test]
    fn invalid_override_changes_nothing() {
        let mut config = AppConfig::default();
        let err = config
            .apply_env(env(&[(ENV_API_URL, "ftp://nope"), (ENV_TIMEOUT_SECS, "5")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
        assert_eq!(config, AppConfig::default());

        let err = config
            .apply_env(env(&[(ENV_TIMEOUT_SECS, "soon")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::InvalidTimeout("soon".into()));
    }

    #[test]
    fn partial_settings_file_fills_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"api_base_url":"http://ops:8080","table":{"overscan":5}}"#)
                .unwrap();
        assert_eq!(config.api_base_url, "http://ops:8080");
        assert_eq!(config.table.overscan, 5);
        assert_eq!(config.table.row_height, 36.0);
        assert_eq!(config.request_timeout_secs, DEFAULT_TIMEOUT_SECS);
    }
}
