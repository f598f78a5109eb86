//! Runtime configuration of the watcher.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::{ConfigFile, RuleSettings, DEFAULT_ARRIVAL_DISTANCE_NM, DEFAULT_POLL_INTERVAL_SECS};
use crate::geo::Coordinate;

/// Sent flags document name inside the state directory.
pub const SENT_FLAGS_FILE: &str = "sent_flags.json";

/// Pool recency document name inside the state directory.
pub const LRU_STATE_FILE: &str = "lru_state.json";

/// Locations of the persisted state documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatePaths {
    pub sent_flags: PathBuf,
    pub lru_state: PathBuf,
}

impl StatePaths {
    /// Standard file names inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            sent_flags: dir.join(SENT_FLAGS_FILE),
            lru_state: dir.join(LRU_STATE_FILE),
        }
    }
}

/// Everything the watcher needs besides its data sources.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Base airports in scope for arrival packages and slot updates.
    pub airports: BTreeMap<String, Coordinate>,
    /// Arrival package trigger distance.
    pub arrival_distance_nm: f64,
    /// Time between cycles.
    pub poll_interval: Duration,
    /// Notification toggles and the ground heuristic.
    pub rules: RuleSettings,
    /// Persisted state.
    pub state: StatePaths,
}

impl WatchConfig {
    /// Watcher configuration with default rules, storing state in `state_dir`.
    pub fn new(state_dir: &Path) -> Self {
        let defaults = ConfigFile::default();
        Self {
            airports: defaults.airports,
            arrival_distance_nm: DEFAULT_ARRIVAL_DISTANCE_NM,
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            rules: defaults.rules,
            state: StatePaths::in_dir(state_dir),
        }
    }

    /// Build from the loaded config file.
    pub fn from_config_file(config: &ConfigFile) -> Self {
        Self {
            airports: config.airports.clone(),
            arrival_distance_nm: config.watch.arrival_distance_nm,
            poll_interval: Duration::from_secs(config.watch.poll_interval),
            rules: config.rules.clone(),
            state: StatePaths::in_dir(&config.watch.state_dir),
        }
    }

    /// Replace the base airport set.
    pub fn with_airports<I, S>(mut self, airports: I) -> Self
    where
        I: IntoIterator<Item = (S, Coordinate)>,
        S: Into<String>,
    {
        self.airports = airports
            .into_iter()
            .map(|(icao, c)| (icao.into().trim().to_uppercase(), c))
            .collect();
        self
    }

    /// Set the arrival package distance.
    pub fn with_arrival_distance_nm(mut self, distance_nm: f64) -> Self {
        self.arrival_distance_nm = distance_nm;
        self
    }

    /// Set the poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Replace the notification rules.
    pub fn with_rules(mut self, rules: RuleSettings) -> Self {
        self.rules = rules;
        self
    }

    /// Reference point of a base airport.
    pub fn airport(&self, icao: &str) -> Option<&Coordinate> {
        self.airports.get(icao)
    }
}
