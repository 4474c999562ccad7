//! Shared setup for commands that run background tasks.

use cellguard::config::ConfigFile;
use cellguard::logging::{init_logging, LoggingGuard};
use tokio::runtime::{Handle, Runtime};
use tracing::info;

use crate::error::CliError;

/// Loaded configuration, logging and the Tokio runtime.
pub struct CliRunner {
    config: ConfigFile,
    runtime: Runtime,
    _log_guard: LoggingGuard,
}

impl CliRunner {
    /// Loads the config file, installs logging and starts the runtime.
    pub fn new(verbose: bool) -> Result<Self, CliError> {
        let config = ConfigFile::load()?;

        let mut logging = config.logging.clone();
        if verbose {
            logging.level = "debug".to_string();
        }
        let log_guard = init_logging(&logging)?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("cellguard-worker")
            .build()
            .map_err(|e| CliError::RuntimeCreation(e.to_string()))?;

        Ok(Self {
            config,
            runtime,
            _log_guard: log_guard,
        })
    }

    /// The loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Handle to the runtime for spawning background tasks.
    pub fn handle(&self) -> Handle {
        self.runtime.handle().clone()
    }

    /// Runs `future` to completion on the runtime.
    pub fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Logs the command being run.
    pub fn log_startup(&self, command: &str) {
        info!(
            command,
            version = env!("CARGO_PKG_VERSION"),
            "CellGuard starting"
        );
    }
}
