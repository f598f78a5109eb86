//! CLI error handling with user-friendly messages.

use std::fmt;
use std::process;

use gocwatch::acars::DeliveryError;
use gocwatch::config::{config_file_path, ConfigFileError};
use gocwatch::error::FetchError;
use gocwatch::persist::StoreError;
use gocwatch::stand::RuleSetError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration file could not be loaded or saved
    Config(ConfigFileError),
    /// No Hoppie logon code configured
    MissingLogon,
    /// Invalid command-line input
    Usage(String),
    /// HTTP client could not be created
    Client(String),
    /// A data source could not be read
    Fetch(FetchError),
    /// Persisted state could not be loaded or saved
    State(StoreError),
    /// Stand rules could not be loaded
    Rules(RuleSetError),
    /// Telex was not delivered
    Delivery(DeliveryError),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::MissingLogon => {
                eprintln!();
                eprintln!("Set your Hoppie logon code in one of:");
                eprintln!("  1. logon = ... under [hoppie] in {}", config_file_path().display());
                eprintln!("  2. the HOPPIE_LOGON environment variable");
                eprintln!("Run 'gocwatch config init' to create the config file.");
            }
            CliError::State(_) => {
                eprintln!();
                eprintln!("The state documents are plain JSON. Fix or remove the file named");
                eprintln!("above; removing sent_flags.json re-sends one-shot messages.");
            }
            CliError::Delivery(DeliveryError::Rejected(_)) => {
                eprintln!();
                eprintln!("Common causes:");
                eprintln!("  1. Wrong logon code");
                eprintln!("  2. Destination callsign not connected to Hoppie");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::MissingLogon => write!(f, "No Hoppie logon code configured"),
            CliError::Usage(msg) => write!(f, "{}", msg),
            CliError::Client(msg) => write!(f, "Failed to create HTTP client: {}", msg),
            CliError::Fetch(e) => write!(f, "Network data unavailable: {}", e),
            CliError::State(e) => write!(f, "State error: {}", e),
            CliError::Rules(e) => write!(f, "Stand rules error: {}", e),
            CliError::Delivery(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::State(e) => Some(e),
            CliError::Rules(e) => Some(e),
            CliError::Delivery(e) => Some(e),
            CliError::Fetch(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        CliError::State(e)
    }
}

impl From<DeliveryError> for CliError {
    fn from(e: DeliveryError) -> Self {
        CliError::Delivery(e)
    }
}

impl From<FetchError> for CliError {
    fn from(e: FetchError) -> Self {
        CliError::Fetch(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            CliError::MissingLogon.to_string(),
            "No Hoppie logon code configured"
        );
        let err = CliError::Delivery(DeliveryError::Rejected("error {bad logon}".to_string()));
        assert!(err.to_string().contains("bad logon"));
    }

    #[test]
    fn test_source_chain() {
        use std::error::Error;
        let err = CliError::from(DeliveryError::Http("timeout".to_string()));
        assert!(err.source().is_some());
        assert!(CliError::MissingLogon.source().is_none());

        let err = CliError::from(FetchError::Http("HTTP 503".to_string()));
        assert!(matches!(err, CliError::Fetch(_)));
        assert!(err.to_string().contains("503"));
    }
}
