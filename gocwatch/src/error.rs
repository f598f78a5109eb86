//! Error taxonomy shared across the watcher.
//!
//! Each external boundary has its own error type; all of them are reachable
//! from this module.
//!
//! | Error                | Raised by                        | Handling                         |
//! |----------------------|----------------------------------|----------------------------------|
//! | [`FetchError`]       | VATSIM feed, CDM slot pages      | source skipped for this cycle    |
//! | [`RuleSetError`]     | gate rule loading                | stand falls back to `TBD/APRON`  |
//! | [`DeliveryError`]    | Hoppie telex                     | logged, trigger still marked     |
//! | [`MalformedInput`]   | coordinates, candidate pools     | that flight skipped this cycle   |
//! | [`StoreError`]       | state documents                  | logged, retried on next change   |
//! | [`ConfigFileError`]  | config.ini                       | fatal at startup                 |

use thiserror::Error;

pub use crate::acars::DeliveryError;
pub use crate::config::ConfigFileError;
pub use crate::persist::StoreError;
pub use crate::stand::RuleSetError;

/// A fetch from an external data source failed (network, HTTP status or parse).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// HTTP request failed or returned a non-success status.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The response body could not be decoded.
    #[error("Failed to parse response: {0}")]
    Parse(String),
}

/// Input rejected before use.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MalformedInput {
    /// Latitude/longitude missing, non-finite or out of range.
    #[error("invalid coordinate ({latitude}, {longitude})")]
    Coordinate { latitude: f64, longitude: f64 },

    /// A pool resolution was attempted with no candidates.
    #[error("empty candidate pool for {airport}")]
    EmptyPool { airport: String },

    /// Callsign is empty or does not start with a letter.
    #[error("invalid callsign '{0}'")]
    Callsign(String),
}
