//! CLI error type.

use std::fmt;

use cellguard::config::ConfigError;
use cellguard::logging::LoggingError;
use cellguard::task::{Refusal, TaskError};

/// Errors reported by CLI commands.
#[derive(Debug)]
pub enum CliError {
    /// Invalid or missing configuration.
    Config(String),

    /// Reading or writing the configuration file failed.
    ConfigFile(ConfigError),

    /// Logging could not be set up.
    Logging(LoggingError),

    /// Invalid command-line argument.
    InvalidArgument(String),

    /// File I/O failed.
    Io(String),

    /// The operation was refused before it started.
    Refused(Refusal),

    /// The background task failed.
    Task(TaskError),

    /// Failed to create the Tokio runtime.
    RuntimeCreation(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ConfigFile(e) => write!(f, "Configuration file error: {}", e),
            CliError::Logging(e) => write!(f, "Failed to initialize logging: {}", e),
            CliError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            CliError::Io(msg) => write!(f, "{}", msg),
            CliError::Refused(refusal) => write!(f, "{}", refusal),
            CliError::Task(e) => write!(f, "{}", e),
            CliError::RuntimeCreation(msg) => {
                write!(f, "Failed to create Tokio runtime: {}", msg)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ConfigFile(e) => Some(e),
            CliError::Logging(e) => Some(e),
            CliError::Refused(e) => Some(e),
            CliError::Task(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::Logging(e)
    }
}

impl From<Refusal> for CliError {
    fn from(r: Refusal) -> Self {
        CliError::Refused(r)
    }
}

impl From<TaskError> for CliError {
    fn from(e: TaskError) -> Self {
        CliError::Task(e)
    }
}
