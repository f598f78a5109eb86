//! Default values for all configuration settings.

use std::collections::BTreeMap;

use super::file::config_directory;
use super::settings::*;
use crate::acars::{DEFAULT_HOPPIE_URL, DEFAULT_STATION};
use crate::cdm::DEFAULT_CDM_URL_TEMPLATE;
use crate::geo::Coordinate;
use crate::message::DEFAULT_HEADER;
use crate::network::{DEFAULT_FLEET_PREFIX, DEFAULT_VATSIM_DATA_URL};

/// Default seconds between polls.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 20;

/// Default HTTP timeout in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 20;

/// Default arrival package trigger distance.
pub const DEFAULT_ARRIVAL_DISTANCE_NM: f64 = 100.0;

/// Default ground heuristic: at or below this altitude.
pub const DEFAULT_GROUND_MAX_ALTITUDE_FT: i32 = 2500;

/// Default ground heuristic: at or below this groundspeed.
pub const DEFAULT_GROUND_MAX_GROUNDSPEED_KT: i32 = 60;

/// Environment variable overriding `[hoppie] logon`.
pub const ENV_HOPPIE_LOGON: &str = "HOPPIE_LOGON";

/// Environment variable overriding `[hoppie] station`.
pub const ENV_STATION: &str = "GOC_STATION";

/// Base airports and their reference points.
pub const DEFAULT_AIRPORTS: &[(&str, f64, f64)] = &[
    ("LEVC", 39.4893, -0.4816),
    ("LEBL", 41.2971, 2.0785),
    ("LEMD", 40.4719, -3.5626),
];

/// Default base airport map.
pub fn default_airports() -> BTreeMap<String, Coordinate> {
    DEFAULT_AIRPORTS
        .iter()
        .map(|(icao, lat, lon)| {
            (
                icao.to_string(),
                Coordinate {
                    latitude: *lat,
                    longitude: *lon,
                },
            )
        })
        .collect()
}

impl Default for ConfigFile {
    fn default() -> Self {
        let config_dir = config_directory();

        Self {
            hoppie: HoppieSettings {
                logon: None,
                station: DEFAULT_STATION.to_string(),
                url: DEFAULT_HOPPIE_URL.to_string(),
                header: DEFAULT_HEADER.to_string(),
            },
            network: NetworkSettings {
                vatsim_url: DEFAULT_VATSIM_DATA_URL.to_string(),
                cdm_url: DEFAULT_CDM_URL_TEMPLATE.to_string(),
                fleet_prefix: DEFAULT_FLEET_PREFIX.to_string(),
                timeout: DEFAULT_HTTP_TIMEOUT_SECS,
            },
            watch: WatchSettings {
                poll_interval: DEFAULT_POLL_INTERVAL_SECS,
                arrival_distance_nm: DEFAULT_ARRIVAL_DISTANCE_NM,
                state_dir: config_dir.join("state"),
                gates_dir: config_dir.join("gates"),
            },
            rules: RuleSettings {
                welcome: true,
                arrival: true,
                tsat: true,
                welcome_requires_ground: false,
                ground_max_altitude_ft: DEFAULT_GROUND_MAX_ALTITUDE_FT,
                ground_max_groundspeed_kt: DEFAULT_GROUND_MAX_GROUNDSPEED_KT,
            },
            airports: default_airports(),
            logging: LoggingSettings {
                file: config_dir.join("logs").join("gocwatch.log"),
            },
        }
    }
}
