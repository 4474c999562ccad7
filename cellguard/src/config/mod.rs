//! Configuration file handling.
//!
//! Settings live in an INI file at `~/.config/cellguard/config.ini`
//! (platform equivalent via [`dirs::config_dir`]):
//!
//! ```ini
//! [ocid]
//! api_key = 0123456789abcdef
//! base_url = http://www.opencellid.org
//! radius_km = 2
//! timeout_secs = 30
//!
//! [logging]
//! level = info
//! file = /var/log/cellguard.log
//! ```
//!
//! Missing files and missing keys fall back to defaults.

mod file;
mod keys;

use std::fmt;

pub use file::{config_file_path, ConfigFile, LoggingSettings, OcidSettings};
pub use keys::ConfigKey;

/// Placeholder value meaning "no key configured".
pub const API_KEY_UNSET: &str = "NA";

/// An OpenCellID API key.
///
/// Construct with [`ApiKey::parse`], which rejects the empty string and
/// the [`API_KEY_UNSET`] placeholder. The key is redacted in `Debug`
/// output.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Parses a configured key, returning `None` when it is unset.
    pub fn parse(raw: &str) -> Option<Self> {
        let key = raw.trim();
        if key.is_empty() || key == API_KEY_UNSET {
            None
        } else {
            Some(Self(key.to_string()))
        }
    }

    /// The key as sent to the server.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(****)")
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading or writing the file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid INI.
    #[error("Failed to parse {path}: {reason}")]
    Parse { path: String, reason: String },

    /// A value has the wrong format.
    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    /// Unknown `section.key` name.
    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),
}
