//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct fields.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::str::FromStr;

use ini::{Ini, Properties};

use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::geo::Coordinate;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [hoppie] section
    if let Some(section) = ini.section(Some("hoppie")) {
        if let Some(v) = section.get("logon") {
            let v = v.trim();
            config.hoppie.logon = (!v.is_empty()).then(|| v.to_string());
        }
        if let Some(v) = non_empty(section, "station") {
            config.hoppie.station = v.to_uppercase();
        }
        if let Some(v) = non_empty(section, "url") {
            config.hoppie.url = v.to_string();
        }
        if let Some(v) = non_empty(section, "header") {
            config.hoppie.header = v.to_uppercase();
        }
    }

    // [network] section
    if let Some(section) = ini.section(Some("network")) {
        if let Some(v) = non_empty(section, "vatsim_url") {
            config.network.vatsim_url = v.to_string();
        }
        if let Some(v) = non_empty(section, "cdm_url") {
            if !v.contains("{icao}") {
                return Err(invalid("network", "cdm_url", v, "must contain '{icao}'"));
            }
            config.network.cdm_url = v.to_string();
        }
        if let Some(v) = section.get("fleet_prefix") {
            let v = v.trim();
            if v.is_empty() {
                return Err(invalid("network", "fleet_prefix", v, "must not be empty"));
            }
            config.network.fleet_prefix = v.to_uppercase();
        }
        if let Some(v) = section.get("timeout") {
            config.network.timeout =
                parse_positive(v, "network", "timeout", "must be a positive integer (seconds)")?;
        }
    }

    // [watch] section
    if let Some(section) = ini.section(Some("watch")) {
        if let Some(v) = section.get("poll_interval") {
            config.watch.poll_interval = parse_positive(
                v,
                "watch",
                "poll_interval",
                "must be a positive integer (seconds)",
            )?;
        }
        if let Some(v) = section.get("arrival_distance_nm") {
            config.watch.arrival_distance_nm = v
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|d| d.is_finite() && *d > 0.0)
                .ok_or_else(|| {
                    invalid("watch", "arrival_distance_nm", v, "must be a positive number")
                })?;
        }
        if let Some(v) = non_empty(section, "state_dir") {
            config.watch.state_dir = expand_tilde(v);
        }
        if let Some(v) = non_empty(section, "gates_dir") {
            config.watch.gates_dir = expand_tilde(v);
        }
    }

    // [rules] section
    if let Some(section) = ini.section(Some("rules")) {
        if let Some(v) = section.get("welcome") {
            config.rules.welcome = parse_bool(v);
        }
        if let Some(v) = section.get("arrival") {
            config.rules.arrival = parse_bool(v);
        }
        if let Some(v) = section.get("tsat") {
            config.rules.tsat = parse_bool(v);
        }
        if let Some(v) = section.get("welcome_requires_ground") {
            config.rules.welcome_requires_ground = parse_bool(v);
        }
        if let Some(v) = section.get("ground_max_altitude_ft") {
            config.rules.ground_max_altitude_ft =
                parse_number(v, "rules", "ground_max_altitude_ft", "must be an integer (feet)")?;
        }
        if let Some(v) = section.get("ground_max_groundspeed_kt") {
            config.rules.ground_max_groundspeed_kt = parse_number(
                v,
                "rules",
                "ground_max_groundspeed_kt",
                "must be an integer (knots)",
            )?;
        }
    }

    // [airports] section replaces the default set when present
    if let Some(section) = ini.section(Some("airports")) {
        let mut airports = BTreeMap::new();
        for (icao, value) in section.iter() {
            let icao = icao.trim().to_uppercase();
            let coordinate = parse_coordinate(value)
                .ok_or_else(|| invalid("airports", &icao, value, "expected 'latitude, longitude'"))?;
            airports.insert(icao, coordinate);
        }
        config.airports = airports;
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = non_empty(section, "file") {
            config.logging.file = expand_tilde(v);
        }
    }

    Ok(config)
}

fn non_empty<'a>(section: &'a Properties, key: &str) -> Option<&'a str> {
    section.get(key).map(str::trim).filter(|v| !v.is_empty())
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_number<T: FromStr>(
    value: &str,
    section: &str,
    key: &str,
    reason: &str,
) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, value, reason))
}

fn parse_positive(value: &str, section: &str, key: &str, reason: &str) -> Result<u64, ConfigFileError> {
    let parsed: u64 = parse_number(value, section, key, reason)?;
    if parsed == 0 {
        return Err(invalid(section, key, value, reason));
    }
    Ok(parsed)
}

/// Parse `"lat, lon"` in decimal degrees.
pub(super) fn parse_coordinate(value: &str) -> Option<Coordinate> {
    let (lat, lon) = value.split_once(',')?;
    let lat = lat.trim().parse().ok()?;
    let lon = lon.trim().parse().ok()?;
    Coordinate::new(lat, lon).ok()
}

/// Parse a boolean value from a config string.
/// Accepts: true/false, yes/no, 1/0, on/off (case-insensitive)
pub(super) fn parse_bool(value: &str) -> bool {
    let v = value.trim().to_lowercase();
    v == "true" || v == "1" || v == "yes" || v == "on"
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn load(content: &str) -> Result<ConfigFile, ConfigFileError> {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");
        std::fs::write(&config_path, content).unwrap();
        ConfigFile::load_from(&config_path)
    }

    #[test]
    fn test_partial_config() {
        let config = load(
            r#"
[hoppie]
logon = abc123
station = hpfops

[watch]
poll_interval = 30
arrival_distance_nm = 80.5
"#,
        )
        .unwrap();

        assert_eq!(config.hoppie.logon.as_deref(), Some("abc123"));
        assert_eq!(config.hoppie.station, "HPFOPS");
        assert_eq!(config.watch.poll_interval, 30);
        assert_eq!(config.watch.arrival_distance_nm, 80.5);
        // untouched sections keep defaults
        assert_eq!(config.network, ConfigFile::default().network);
        assert_eq!(config.airports.len(), 3);
    }

    #[test]
    fn test_blank_logon_is_none() {
        let config = load("[hoppie]\nlogon =\n").unwrap();
        assert!(config.hoppie.logon.is_none());
    }

    #[test]
    fn test_invalid_poll_interval() {
        let err = load("[watch]\npoll_interval = 0\n").unwrap_err();
        assert!(err.to_string().contains("poll_interval"));

        let err = load("[watch]\npoll_interval = soon\n").unwrap_err();
        assert!(matches!(err, ConfigFileError::InvalidValue { .. }));
    }

    #[test]
    fn test_invalid_cdm_url() {
        let err = load("[network]\ncdm_url = https://example.com/cdm\n").unwrap_err();
        assert!(err.to_string().contains("{icao}"));
    }

    #[test]
    fn test_rule_toggles() {
        let config = load(
            r#"
[rules]
welcome = no
tsat = off
welcome_requires_ground = yes
ground_max_altitude_ft = 3000
"#,
        )
        .unwrap();

        assert!(!config.rules.welcome);
        assert!(config.rules.arrival);
        assert!(!config.rules.tsat);
        assert!(config.rules.welcome_requires_ground);
        assert_eq!(config.rules.ground_max_altitude_ft, 3000);
        assert_eq!(config.rules.ground_max_groundspeed_kt, 60);
    }

    #[test]
    fn test_airports_replace_defaults() {
        let config = load("[airports]\nlepa = 39.5517, 2.7388\n").unwrap();
        assert_eq!(config.airports.len(), 1);
        let lepa = config.airports["LEPA"];
        assert_eq!(lepa.latitude, 39.5517);
        assert_eq!(lepa.longitude, 2.7388);
    }

    #[test]
    fn test_invalid_airport_coordinate() {
        let err = load("[airports]\nLEPA = 139.5, 2.7\n").unwrap_err();
        assert!(err.to_string().contains("LEPA"));
    }

    #[test]
    fn test_parse_bool_values() {
        for v in ["true", "TRUE", "1", "yes", " on "] {
            assert!(parse_bool(v), "{}", v);
        }
        for v in ["false", "0", "no", "off", ""] {
            assert!(!parse_bool(v), "{}", v);
        }
    }

    #[test]
    fn test_expand_tilde() {
        let path = expand_tilde("~/test/path");
        if let Some(home) = dirs::home_dir() {
            assert_eq!(path, home.join("test/path"));
        }

        let path = expand_tilde("/absolute/path");
        assert_eq!(path, PathBuf::from("/absolute/path"));
    }
}
