//! Per-poll flight snapshot and callsign helpers.

use crate::error::MalformedInput;
use crate::geo::Coordinate;

/// One fleet flight as seen in the current poll.
///
/// Rebuilt from the live feed every cycle and never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightSnapshot {
    /// Normalized callsign (unique key).
    pub callsign: String,
    /// Flight-plan departure ICAO, empty when no plan is filed.
    pub departure: String,
    /// Flight-plan arrival ICAO, empty when no plan is filed.
    pub arrival: String,
    /// Current position.
    pub position: Coordinate,
    /// Altitude in feet.
    pub altitude_ft: i32,
    /// Groundspeed in knots.
    pub groundspeed_kt: i32,
    /// ICAO aircraft type designator, empty when unknown.
    pub aircraft_type: String,
}

impl FlightSnapshot {
    /// Create a snapshot, normalizing the callsign and airport codes.
    pub fn new(
        callsign: &str,
        departure: &str,
        arrival: &str,
        position: Coordinate,
    ) -> Result<Self, MalformedInput> {
        let callsign = normalize_callsign(callsign);
        if !callsign
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic())
        {
            return Err(MalformedInput::Callsign(callsign));
        }

        Ok(Self {
            callsign,
            departure: normalize_code(departure),
            arrival: normalize_code(arrival),
            position,
            altitude_ft: 0,
            groundspeed_kt: 0,
            aircraft_type: String::new(),
        })
    }

    /// Set altitude and groundspeed.
    pub fn with_motion(mut self, altitude_ft: i32, groundspeed_kt: i32) -> Self {
        self.altitude_ft = altitude_ft;
        self.groundspeed_kt = groundspeed_kt;
        self
    }

    /// Set the aircraft type from a flight-plan aircraft string.
    pub fn with_aircraft(mut self, aircraft: &str) -> Self {
        self.aircraft_type = aircraft_type_code(aircraft);
        self
    }

    /// Ground heuristic: low and slow.
    pub fn is_on_ground(&self, max_altitude_ft: i32, max_groundspeed_kt: i32) -> bool {
        self.altitude_ft <= max_altitude_ft && self.groundspeed_kt <= max_groundspeed_kt
    }
}

/// Trim and uppercase a callsign.
pub fn normalize_callsign(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Trim and uppercase an airport or type code.
pub fn normalize_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Leading alphabetic run of a callsign, uppercased (`"vlg123"` -> `"VLG"`).
pub fn alphabetic_prefix(callsign: &str) -> String {
    callsign
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect::<String>()
        .to_uppercase()
}

/// ICAO type designator from a flight-plan aircraft field.
///
/// Handles both the short form (`"A20N/M"`) and the ICAO equipment form
/// with a wake category prefix (`"H/B748/L"`).
pub fn aircraft_type_code(raw: &str) -> String {
    let mut parts = raw.trim().split('/');
    let first = parts.next().unwrap_or("").trim();

    let code = match first {
        "L" | "M" | "H" | "J" => parts.next().unwrap_or(first).trim(),
        _ => first,
    };

    code.split('-').next().unwrap_or("").trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos() -> Coordinate {
        Coordinate::new(40.0, -3.0).unwrap()
    }

    #[test]
    fn test_snapshot_normalizes_fields() {
        let flight = FlightSnapshot::new(" hpf123 ", "levc", " LEMD", pos()).unwrap();
        assert_eq!(flight.callsign, "HPF123");
        assert_eq!(flight.departure, "LEVC");
        assert_eq!(flight.arrival, "LEMD");
    }

    #[test]
    fn test_snapshot_rejects_bad_callsign() {
        assert!(FlightSnapshot::new("", "LEVC", "LEMD", pos()).is_err());
        assert!(FlightSnapshot::new("123ABC", "LEVC", "LEMD", pos()).is_err());
    }

    #[test]
    fn test_alphabetic_prefix() {
        assert_eq!(alphabetic_prefix("HPF123"), "HPF");
        assert_eq!(alphabetic_prefix("vlg45a"), "VLG");
        assert_eq!(alphabetic_prefix("IBE"), "IBE");
        assert_eq!(alphabetic_prefix("1ABC"), "");
    }

    #[test]
    fn test_aircraft_type_code() {
        assert_eq!(aircraft_type_code("A20N/M"), "A20N");
        assert_eq!(aircraft_type_code("H/B748/L"), "B748");
        assert_eq!(aircraft_type_code("b738/m-sdfgirwy/lb1"), "B738");
        assert_eq!(aircraft_type_code("A320"), "A320");
        assert_eq!(aircraft_type_code(""), "");
    }

    #[test]
    fn test_on_ground_heuristic() {
        let flight = FlightSnapshot::new("HPF1", "LEVC", "LEMD", pos())
            .unwrap()
            .with_motion(120, 15);
        assert!(flight.is_on_ground(2500, 60));

        let airborne = flight.with_motion(12000, 320);
        assert!(!airborne.is_on_ground(2500, 60));
    }
}
