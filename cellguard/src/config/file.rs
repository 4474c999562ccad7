//! INI-backed configuration file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use ini::Ini;
use tracing::debug;

use super::{ApiKey, ConfigError};
use crate::provider::{DEFAULT_BASE_URL, DEFAULT_RADIUS_KM, DEFAULT_TIMEOUT_SECS};

const SECTION_OCID: &str = "ocid";
const SECTION_LOGGING: &str = "logging";

/// Returns the configuration file location.
///
/// Falls back to the working directory when the platform has no
/// configuration directory.
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cellguard")
        .join("config.ini")
}

/// `[ocid]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct OcidSettings {
    /// API key, `None` when unset.
    pub api_key: Option<ApiKey>,
    /// Server base URL.
    pub base_url: String,
    /// Search radius around the device in kilometers.
    pub radius_km: f64,
    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for OcidSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            radius_km: DEFAULT_RADIUS_KM,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl OcidSettings {
    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Default filter directive, overridden by `RUST_LOG`.
    pub level: String,
    /// Optional log file.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

/// Contents of the configuration file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    /// OpenCellID settings.
    pub ocid: OcidSettings,
    /// Logging settings.
    pub logging: LoggingSettings,
}

impl ConfigFile {
    /// Loads the file at [`config_file_path`].
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Loads `path`; a missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path).map_err(|e| match e {
            ini::Error::Io(io) => ConfigError::Io(io),
            ini::Error::Parse(parse) => ConfigError::Parse {
                path: path.display().to_string(),
                reason: parse.to_string(),
            },
        })?;
        Self::from_ini(&ini)
    }

    /// Parses INI text.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str(text).map_err(|e| ConfigError::Parse {
            path: "<string>".to_string(),
            reason: e.to_string(),
        })?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        for (section, props) in ini.iter() {
            let Some(section) = section else { continue };
            for (key, value) in props.iter() {
                let name = format!("{}.{}", section, key);
                match name.parse::<super::ConfigKey>() {
                    Ok(config_key) => config_key.set(&mut config, value)?,
                    Err(_) => debug!(key = %name, "Ignoring unknown config key"),
                }
            }
        }
        Ok(config)
    }

    /// Saves to [`config_file_path`], creating the directory if needed.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path())
    }

    /// Saves to `path`, creating the parent directory if needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        self.to_ini().write_to_file(path)?;
        debug!(path = %path.display(), "Config file saved");
        Ok(())
    }

    fn to_ini(&self) -> Ini {
        let mut ini = Ini::new();
        ini.with_section(Some(SECTION_OCID))
            .set(
                "api_key",
                self.ocid
                    .api_key
                    .as_ref()
                    .map_or(super::API_KEY_UNSET, |k| k.as_str()),
            )
            .set("base_url", self.ocid.base_url.as_str())
            .set("radius_km", self.ocid.radius_km.to_string())
            .set("timeout_secs", self.ocid.timeout_secs.to_string());

        ini.with_section(Some(SECTION_LOGGING))
            .set("level", self.logging.level.as_str());
        if let Some(file) = &self.logging.file {
            ini.with_section(Some(SECTION_LOGGING))
                .set("file", file.display().to_string());
        }
        ini
    }
}
