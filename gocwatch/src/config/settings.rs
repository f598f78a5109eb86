//! Settings structs, one per `[section]` of the INI file.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::geo::Coordinate;

/// Complete configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Hoppie ACARS credentials and identity
    pub hoppie: HoppieSettings,
    /// Upstream data sources
    pub network: NetworkSettings,
    /// Poll loop and state locations
    pub watch: WatchSettings,
    /// Notification toggles
    pub rules: RuleSettings,
    /// Base airports and their reference points
    pub airports: BTreeMap<String, Coordinate>,
    /// Log output
    pub logging: LoggingSettings,
}

/// `[hoppie]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoppieSettings {
    /// Logon code; required for anything that sends.
    pub logon: Option<String>,
    /// Sending station callsign.
    pub station: String,
    /// Connect endpoint.
    pub url: String,
    /// First line of generated messages.
    pub header: String,
}

/// `[network]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkSettings {
    pub vatsim_url: String,
    /// CDM viewer URL containing `{icao}`.
    pub cdm_url: String,
    /// Callsign prefix of fleet flights.
    pub fleet_prefix: String,
    /// HTTP timeout in seconds.
    pub timeout: u64,
}

/// `[watch]`
#[derive(Debug, Clone, PartialEq)]
pub struct WatchSettings {
    /// Seconds between polls.
    pub poll_interval: u64,
    /// Arrival package trigger distance.
    pub arrival_distance_nm: f64,
    /// Directory for `sent_flags.json` and `lru_state.json`.
    pub state_dir: PathBuf,
    /// Directory of `<ICAO>.json` stand rule files.
    pub gates_dir: PathBuf,
}

/// `[rules]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSettings {
    pub welcome: bool,
    pub arrival: bool,
    pub tsat: bool,
    /// Only welcome flights that are on the ground.
    pub welcome_requires_ground: bool,
    pub ground_max_altitude_ft: i32,
    pub ground_max_groundspeed_kt: i32,
}

/// `[logging]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Log file, truncated at startup.
    pub file: PathBuf,
}
