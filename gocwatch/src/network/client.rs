//! Flight source trait and VATSIM implementation.

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;

use crate::error::FetchError;
use crate::flight::FlightSnapshot;
use crate::geo::Coordinate;

/// Provider of the current fleet flights.
pub trait FlightSource: Send + Sync {
    /// Fetch every fleet flight currently online.
    fn fetch_live_flights(
        &self,
    ) -> impl Future<Output = Result<Vec<FlightSnapshot>, FetchError>> + Send;
}

/// Top-level VATSIM V3 data feed; only `pilots` is read.
#[derive(Deserialize)]
struct VatsimData {
    #[serde(default)]
    pilots: Vec<VatsimPilot>,
}

#[derive(Deserialize)]
struct VatsimPilot {
    #[serde(default)]
    callsign: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    #[serde(default)]
    altitude: Option<i32>,
    #[serde(default)]
    groundspeed: Option<i32>,
    #[serde(default)]
    flight_plan: Option<VatsimFlightPlan>,
}

#[derive(Default, Deserialize)]
struct VatsimFlightPlan {
    #[serde(default)]
    departure: Option<String>,
    #[serde(default)]
    arrival: Option<String>,
    #[serde(default)]
    aircraft_short: Option<String>,
    #[serde(default)]
    aircraft: Option<String>,
}

/// Decode a V3 feed body, keeping pilots whose callsign starts with `fleet_prefix`.
///
/// Pilots without a usable position are skipped with a debug log.
pub fn parse_vatsim_feed(body: &[u8], fleet_prefix: &str) -> Result<Vec<FlightSnapshot>, FetchError> {
    let data: VatsimData =
        serde_json::from_slice(body).map_err(|e| FetchError::Parse(e.to_string()))?;
    let prefix = fleet_prefix.trim().to_uppercase();

    let total = data.pilots.len();
    let mut flights = Vec::new();

    for pilot in data.pilots {
        let callsign = pilot.callsign.unwrap_or_default().trim().to_uppercase();
        if callsign.is_empty() || !callsign.starts_with(&prefix) {
            continue;
        }

        let (Some(latitude), Some(longitude)) = (pilot.latitude, pilot.longitude) else {
            tracing::debug!(callsign = %callsign, "Skipping pilot without position");
            continue;
        };
        let position = match Coordinate::new(latitude, longitude) {
            Ok(position) => position,
            Err(e) => {
                tracing::debug!(callsign = %callsign, error = %e, "Skipping pilot");
                continue;
            }
        };

        let plan = pilot.flight_plan.unwrap_or_default();
        let aircraft = plan
            .aircraft_short
            .filter(|s| !s.trim().is_empty())
            .or(plan.aircraft)
            .unwrap_or_default();

        match FlightSnapshot::new(
            &callsign,
            plan.departure.as_deref().unwrap_or_default(),
            plan.arrival.as_deref().unwrap_or_default(),
            position,
        ) {
            Ok(snapshot) => flights.push(
                snapshot
                    .with_motion(pilot.altitude.unwrap_or(0), pilot.groundspeed.unwrap_or(0))
                    .with_aircraft(&aircraft),
            ),
            Err(e) => tracing::debug!(error = %e, "Skipping pilot"),
        }
    }

    tracing::debug!(total_pilots = total, fleet = flights.len(), "VATSIM data feed parsed");
    Ok(flights)
}

/// VATSIM client over a reusable `reqwest::Client`.
pub struct VatsimClient {
    http: reqwest::Client,
    data_url: String,
    fleet_prefix: String,
}

impl VatsimClient {
    /// Create a client for the given feed URL and fleet prefix.
    pub fn new(
        data_url: impl Into<String>,
        fleet_prefix: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Http(e.to_string()))?;

        Ok(Self {
            http,
            data_url: data_url.into(),
            fleet_prefix: fleet_prefix.into(),
        })
    }

    /// Feed URL.
    pub fn data_url(&self) -> &str {
        &self.data_url
    }
}

impl FlightSource for VatsimClient {
    async fn fetch_live_flights(&self) -> Result<Vec<FlightSnapshot>, FetchError> {
        let response = self
            .http
            .get(&self.data_url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| FetchError::Http(e.to_string()))?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Http(e.to_string()))?;

        parse_vatsim_feed(&bytes, &self.fleet_prefix)
    }
}
