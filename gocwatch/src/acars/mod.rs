//! Outbound ACARS telex delivery.
//!
//! [`MessageSink`] is the delivery seam used by the watcher and the CLI.
//! [`HoppieClient`] posts telex packets to the Hoppie ACARS network.

mod hoppie;

pub use hoppie::{check_response, to_crlf, DeliveryError, HoppieClient, MessageSink};

/// Hoppie ACARS connect endpoint.
pub const DEFAULT_HOPPIE_URL: &str = "https://www.hoppie.nl/acars/system/connect.html";

/// Default sending station.
pub const DEFAULT_STATION: &str = "HPFGOC";
