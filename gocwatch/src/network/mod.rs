//! Live flight feed.
//!
//! [`FlightSource`] abstracts the online network so the watcher can be driven
//! by an in-memory fake in tests. [`VatsimClient`] reads the VATSIM V3 data
//! feed and keeps only fleet flights.

mod client;

pub use client::{parse_vatsim_feed, FlightSource, VatsimClient};

/// VATSIM V3 data feed.
pub const DEFAULT_VATSIM_DATA_URL: &str = "https://data.vatsim.net/v3/vatsim-data.json";

/// Callsign prefix identifying fleet flights.
pub const DEFAULT_FLEET_PREFIX: &str = "HPF";
