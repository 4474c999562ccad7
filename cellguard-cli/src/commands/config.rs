//! `cellguard config` - inspect and edit `config.ini`.
//!
//! The OpenCellID API key is masked in all output except `config get
//! ocid.api_key`, which prints it verbatim so it can be piped.

use clap::Subcommand;
use cellguard::config::{config_file_path, ConfigFile, ConfigKey};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print one value
    Get {
        /// Key as section.key, e.g. ocid.api_key
        key: String,
    },

    /// Change one value and save the file
    Set {
        /// Key as section.key, e.g. ocid.radius_km
        key: String,

        /// New value ("NA" clears the API key)
        value: String,
    },

    /// Restore a value to its default and save the file
    Reset {
        /// Key as section.key
        key: String,
    },

    /// Print every setting, grouped by section
    List,

    /// Print the location of the configuration file
    Path,
}

/// Runs a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Get { key } => {
            let key = lookup(&key)?;
            let value = key.get(&ConfigFile::load()?);
            println!("{}", if value.is_empty() { "(not set)" } else { value.as_str() });
            Ok(())
        }
        ConfigCommands::Set { key, value } => update(&key, &value),
        ConfigCommands::Reset { key } => {
            let default = lookup(&key)?.get(&ConfigFile::default());
            update(&key, &default)
        }
        ConfigCommands::List => {
            let config = ConfigFile::load()?;
            println!("# {}", config_file_path().display());
            for line in listing(&config) {
                println!("{}", line);
            }
            Ok(())
        }
        ConfigCommands::Path => {
            println!("{}", config_file_path().display());
            Ok(())
        }
    }
}

fn lookup(name: &str) -> Result<ConfigKey, CliError> {
    name.parse().map_err(|_| {
        let known: Vec<&str> = ConfigKey::all().iter().map(ConfigKey::name).collect();
        CliError::Config(format!(
            "unknown key '{}' (known keys: {})",
            name,
            known.join(", ")
        ))
    })
}

fn update(name: &str, value: &str) -> Result<(), CliError> {
    let key = lookup(name)?;
    let mut config = ConfigFile::load()?;
    key.set(&mut config, value)?;
    config.save()?;

    println!("{} = {}", key.name(), display_value(key, &config));
    Ok(())
}

/// Value for display, with the API key masked.
fn display_value(key: ConfigKey, config: &ConfigFile) -> String {
    let value = key.get(config);
    if value.is_empty() {
        "(not set)".to_string()
    } else if key == ConfigKey::OcidApiKey {
        mask(&value)
    } else {
        value
    }
}

/// Keeps the last four characters of a secret.
fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    let keep = chars.len().saturating_sub(4).max(chars.len() / 2);
    let tail: String = chars[keep..].iter().collect();
    format!("{}{}", "*".repeat(keep), tail)
}

/// INI-style lines for `config list`.
fn listing(config: &ConfigFile) -> Vec<String> {
    let mut lines = Vec::new();
    let mut section = "";
    for &key in ConfigKey::all() {
        if key.section() != section {
            section = key.section();
            lines.push(format!("[{}]", section));
        }
        lines.push(format!("{} = {}", key.key_name(), display_value(key, config)));
    }
    lines
}
