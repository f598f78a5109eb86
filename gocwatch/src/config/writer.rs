//! INI serialization logic for converting `ConfigFile` → INI string.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let logon = config.hoppie.logon.as_deref().unwrap_or("");
    let airports = config
        .airports
        .iter()
        .map(|(icao, c)| format!("{} = {}, {}", icao, c.latitude, c.longitude))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"[hoppie]
; Hoppie ACARS logon code (required to send messages)
; The HOPPIE_LOGON environment variable takes precedence
logon = {}
; Sending station callsign (GOC_STATION overrides)
station = {}
url = {}
; First line of every automatic message
header = {}

[network]
vatsim_url = {}
; CDM viewer page, {{icao}} is replaced by the airport code
cdm_url = {}
; Only flights whose callsign starts with this prefix are watched
fleet_prefix = {}
; HTTP timeout in seconds
timeout = {}

[watch]
; Seconds between polls
poll_interval = {}
; Send the arrival package within this distance of the arrival airport
arrival_distance_nm = {}
; sent_flags.json and lru_state.json
state_dir = {}
; One <ICAO>.json stand rule file per airport
gates_dir = {}

[rules]
welcome = {}
arrival = {}
tsat = {}
; Only welcome flights at or below the ground thresholds
welcome_requires_ground = {}
ground_max_altitude_ft = {}
ground_max_groundspeed_kt = {}

[airports]
; Base airports: ICAO = latitude, longitude
{}

[logging]
; Truncated at every start
file = {}
"#,
        logon,
        config.hoppie.station,
        config.hoppie.url,
        config.hoppie.header,
        config.network.vatsim_url,
        config.network.cdm_url,
        config.network.fleet_prefix,
        config.network.timeout,
        config.watch.poll_interval,
        config.watch.arrival_distance_nm,
        path_to_string(&config.watch.state_dir),
        path_to_string(&config.watch.gates_dir),
        config.rules.welcome,
        config.rules.arrival,
        config.rules.tsat,
        config.rules.welcome_requires_ground,
        config.rules.ground_max_altitude_ft,
        config.rules.ground_max_groundspeed_kt,
        airports,
        path_to_string(&config.logging.file),
    )
}

/// Convert a path to a string, using ~ for home directory.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_written_config_has_all_sections() {
        let content = to_config_string(&ConfigFile::default());
        for section in [
            "[hoppie]",
            "[network]",
            "[watch]",
            "[rules]",
            "[airports]",
            "[logging]",
        ] {
            assert!(content.contains(section), "missing {}", section);
        }
        assert!(content.contains("LEMD = 40.4719, -3.5626"));
        assert!(content.contains("cdm_url = https://cdm.vatsimspain.es/CDMViewer.php?airport={icao}"));
    }

    #[test]
    fn test_home_paths_use_tilde() {
        if dirs::home_dir().is_some() {
            let content = to_config_string(&ConfigFile::default());
            assert!(content.contains("state_dir = ~/.gocwatch/state"));
        }
    }
}
