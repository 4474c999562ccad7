//! Addressable configuration keys (`section.key`).

use std::path::PathBuf;
use std::str::FromStr;

use super::{ApiKey, ConfigError, ConfigFile, API_KEY_UNSET};

/// A configuration setting addressable as `section.key`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    OcidApiKey,
    OcidBaseUrl,
    OcidRadiusKm,
    OcidTimeoutSecs,
    LoggingLevel,
    LoggingFile,
}

impl ConfigKey {
    /// All keys, grouped by section.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::OcidApiKey,
            ConfigKey::OcidBaseUrl,
            ConfigKey::OcidRadiusKm,
            ConfigKey::OcidTimeoutSecs,
            ConfigKey::LoggingLevel,
            ConfigKey::LoggingFile,
        ]
    }

    /// Full name, e.g. `ocid.api_key`.
    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::OcidApiKey => "ocid.api_key",
            ConfigKey::OcidBaseUrl => "ocid.base_url",
            ConfigKey::OcidRadiusKm => "ocid.radius_km",
            ConfigKey::OcidTimeoutSecs => "ocid.timeout_secs",
            ConfigKey::LoggingLevel => "logging.level",
            ConfigKey::LoggingFile => "logging.file",
        }
    }

    /// Section part of the name.
    pub fn section(&self) -> &'static str {
        self.name().split_once('.').map_or("", |(s, _)| s)
    }

    /// Key part of the name.
    pub fn key_name(&self) -> &'static str {
        self.name().split_once('.').map_or("", |(_, k)| k)
    }

    /// Current value as a string; empty when unset.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::OcidApiKey => config
                .ocid
                .api_key
                .as_ref()
                .map(|k| k.as_str().to_string())
                .unwrap_or_default(),
            ConfigKey::OcidBaseUrl => config.ocid.base_url.clone(),
            ConfigKey::OcidRadiusKm => config.ocid.radius_km.to_string(),
            ConfigKey::OcidTimeoutSecs => config.ocid.timeout_secs.to_string(),
            ConfigKey::LoggingLevel => config.logging.level.clone(),
            ConfigKey::LoggingFile => config
                .logging
                .file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
        }
    }

    /// Validates and stores `value`.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match self {
            ConfigKey::OcidApiKey => config.ocid.api_key = ApiKey::parse(value),
            ConfigKey::OcidBaseUrl => {
                if !(value.starts_with("http://") || value.starts_with("https://")) {
                    return Err(self.invalid(value, "must start with http:// or https://"));
                }
                config.ocid.base_url = value.trim_end_matches('/').to_string();
            }
            ConfigKey::OcidRadiusKm => {
                let radius: f64 = value
                    .parse()
                    .map_err(|_| self.invalid(value, "not a number"))?;
                if !(radius.is_finite() && radius > 0.0) {
                    return Err(self.invalid(value, "must be greater than zero"));
                }
                config.ocid.radius_km = radius;
            }
            ConfigKey::OcidTimeoutSecs => {
                let secs: u64 = value
                    .parse()
                    .map_err(|_| self.invalid(value, "not a whole number of seconds"))?;
                if secs == 0 {
                    return Err(self.invalid(value, "must be greater than zero"));
                }
                config.ocid.timeout_secs = secs;
            }
            ConfigKey::LoggingLevel => {
                if value.is_empty() {
                    return Err(self.invalid(value, "must not be empty"));
                }
                config.logging.level = value.to_string();
            }
            ConfigKey::LoggingFile => {
                config.logging.file = (!value.is_empty()).then(|| PathBuf::from(value));
            }
        }
        Ok(())
    }

    fn invalid(&self, value: &str, reason: &str) -> ConfigError {
        ConfigError::InvalidValue {
            key: self.name().to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigKey::all()
            .iter()
            .copied()
            .find(|k| k.name() == s)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}
