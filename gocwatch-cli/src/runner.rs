//! CLI runner for common setup.
//!
//! Loads the configuration, applies environment overrides and initializes
//! logging once for every command that talks to the network.

use std::time::Duration;

use gocwatch::acars::HoppieClient;
use gocwatch::config::ConfigFile;
use gocwatch::logging::{init_logging, split_log_path, LoggingGuard};
use gocwatch::message::MessageTemplates;
use tracing::info;

use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    config: ConfigFile,
}

impl CliRunner {
    /// Load config and initialize logging.
    ///
    /// `stdout_enabled` mirrors log events to the terminal.
    pub fn new(stdout_enabled: bool, debug: bool) -> Result<Self, CliError> {
        let mut config = ConfigFile::load()?;
        config.apply_env();

        let (log_dir, log_file) = split_log_path(&config.logging.file);
        let logging_guard = init_logging(&log_dir, &log_file, stdout_enabled, debug)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("GOC Watch v{}", gocwatch::VERSION);
        info!("GOC Watch CLI: {} command", command);
    }

    /// HTTP timeout from `[network] timeout`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.network.timeout)
    }

    /// Hoppie client for the configured station. Requires a logon code.
    pub fn hoppie_client(&self) -> Result<HoppieClient, CliError> {
        let logon = self
            .config
            .hoppie
            .logon
            .clone()
            .ok_or(CliError::MissingLogon)?;

        HoppieClient::new(
            &self.config.hoppie.url,
            logon,
            &self.config.hoppie.station,
            self.timeout(),
        )
        .map_err(|e| CliError::Client(e.to_string()))
    }

    /// Message templates with the configured header.
    pub fn templates(&self) -> MessageTemplates {
        MessageTemplates::new(&self.config.hoppie.header)
    }
}
