//! Flights command - list the fleet currently online.

use std::collections::BTreeMap;

use gocwatch::flight::FlightSnapshot;
use gocwatch::geo::Coordinate;
use gocwatch::network::{FlightSource, VatsimClient};

use crate::error::CliError;
use crate::runner::CliRunner;

/// Shown for a flight-plan field that was not filed.
pub const NOT_FILED: &str = "----";

/// Print one line per online fleet flight.
pub async fn run() -> Result<(), CliError> {
    let runner = CliRunner::new(false, false)?;
    runner.log_startup("flights");
    let config = runner.config();

    let client = VatsimClient::new(
        &config.network.vatsim_url,
        &config.network.fleet_prefix,
        runner.timeout(),
    )?;
    println!("Fetching {}", client.data_url());

    let mut flights = client.fetch_live_flights().await?;
    flights.sort_by(|a, b| a.callsign.cmp(&b.callsign));

    println!(
        "Found {} {} flights online",
        flights.len(),
        config.network.fleet_prefix
    );
    println!();

    let rules = &config.rules;
    for flight in &flights {
        println!(
            "{}",
            flight_line(
                flight,
                &config.airports,
                rules.ground_max_altitude_ft,
                rules.ground_max_groundspeed_kt
            )
        );
    }
    Ok(())
}

/// `CALLSIGN  DEP→ARR  GROUND|AIR (BASE DEP)`
pub fn flight_line(
    flight: &FlightSnapshot,
    bases: &BTreeMap<String, Coordinate>,
    max_altitude_ft: i32,
    max_groundspeed_kt: i32,
) -> String {
    let phase = if flight.is_on_ground(max_altitude_ft, max_groundspeed_kt) {
        "GROUND"
    } else {
        "AIR"
    };

    let mut line = format!(
        "{}  {}→{}  {}",
        flight.callsign,
        filed(&flight.departure),
        filed(&flight.arrival),
        phase
    );
    if bases.contains_key(&flight.departure) {
        line.push_str(&format!(" (BASE {})", flight.departure));
    }
    line
}

/// A flight-plan field, or [`NOT_FILED`] when blank.
pub fn filed(code: &str) -> &str {
    if code.is_empty() {
        NOT_FILED
    } else {
        code
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bases() -> BTreeMap<String, Coordinate> {
        let mut bases = BTreeMap::new();
        bases.insert("LEBL".to_string(), Coordinate::new(41.2971, 2.0785).unwrap());
        bases
    }

    fn flight(callsign: &str, dep: &str, arr: &str) -> FlightSnapshot {
        FlightSnapshot::new(callsign, dep, arr, Coordinate::new(41.0, 2.0).unwrap()).unwrap()
    }

    #[test]
    fn test_ground_flight_at_base() {
        let line = flight_line(&flight("hpf12", "lebl", "lemd"), &bases(), 2500, 60);
        assert_eq!(line, "HPF12  LEBL→LEMD  GROUND (BASE LEBL)");
    }

    #[test]
    fn test_airborne_flight_away_from_base() {
        let line = flight_line(
            &flight("HPF7", "LFPG", "LEMD").with_motion(35000, 460),
            &bases(),
            2500,
            60,
        );
        assert_eq!(line, "HPF7  LFPG→LEMD  AIR");
    }

    #[test]
    fn test_missing_flight_plan() {
        let line = flight_line(&flight("HPF9", "", ""), &bases(), 2500, 60);
        assert_eq!(line, "HPF9  ----→----  GROUND");
    }
}
