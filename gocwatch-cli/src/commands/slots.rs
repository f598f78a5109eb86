//! Slots command - departure slots of the fleet at each base airport.

use std::collections::BTreeMap;

use gocwatch::cdm::{CdmClient, SlotSource, SlotTable};
use gocwatch::error::FetchError;
use gocwatch::flight::FlightSnapshot;
use gocwatch::network::{FlightSource, VatsimClient};
use gocwatch::trigger::SlotState;

use super::flights::filed;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Slot table fetch outcome per base airport.
pub type SlotTables = BTreeMap<String, Result<SlotTable, FetchError>>;

/// List fleet TSATs per base airport, or with `merge` the slot state of
/// every online fleet flight.
pub async fn run(merge: bool) -> Result<(), CliError> {
    let runner = CliRunner::new(false, false)?;
    runner.log_startup("slots");
    let config = runner.config();

    let cdm = CdmClient::new(&config.network.cdm_url, runner.timeout())?;
    let mut tables = SlotTables::new();
    for airport in config.airports.keys() {
        let table = cdm.fetch_slot_table(airport).await;
        if let Err(e) = &table {
            tracing::warn!(airport = %airport, error = %e, "Slot table unavailable");
        }
        tables.insert(airport.clone(), table);
    }

    if !merge {
        for (airport, table) in &tables {
            for line in slot_listing(airport, table, &config.network.fleet_prefix) {
                println!("{}", line);
            }
        }
        return Ok(());
    }

    let client = VatsimClient::new(
        &config.network.vatsim_url,
        &config.network.fleet_prefix,
        runner.timeout(),
    )?;
    let mut flights = client.fetch_live_flights().await?;
    flights.sort_by(|a, b| a.callsign.cmp(&b.callsign));

    println!("Online {} flights: {}", config.network.fleet_prefix, flights.len());
    println!();
    for flight in &flights {
        println!("{}", merge_line(flight, &tables));
    }
    Ok(())
}

/// Fleet flights with a published TSAT at one airport, sorted by callsign.
pub fn slot_listing(
    airport: &str,
    table: &Result<SlotTable, FetchError>,
    fleet_prefix: &str,
) -> Vec<String> {
    let table = match table {
        Ok(table) => table,
        Err(e) => return vec![format!("{}: CDM error {}", airport, e)],
    };

    let prefix = fleet_prefix.trim().to_uppercase();
    let mut lines: Vec<String> = table
        .iter()
        .filter(|(callsign, _)| callsign.starts_with(&prefix))
        .filter_map(|(callsign, raw)| match SlotState::classify(Some(raw.as_str())) {
            SlotState::TimeAssigned(tsat) => {
                Some(format!("{} @ {} TSAT {}", callsign, airport, tsat))
            }
            _ => None,
        })
        .collect();

    if lines.is_empty() {
        return vec![format!("{}: no {} TSAT", airport, prefix)];
    }
    lines.sort();
    lines
}

/// Slot state of one flight at its departure airport.
pub fn merge_line(flight: &FlightSnapshot, tables: &SlotTables) -> String {
    let airport = &flight.departure;
    let Some(table) = tables.get(airport) else {
        return format!(
            "{} dep={}: not a base airport, skip CDM",
            flight.callsign,
            filed(airport)
        );
    };

    let status = match table {
        Err(_) => "CDM_UNAVAILABLE".to_string(),
        Ok(table) => match SlotState::classify(table.get(&flight.callsign).map(String::as_str)) {
            SlotState::NoRecord => "NOT_IN_CDM".to_string(),
            SlotState::RecordNoTime => "IN_CDM_BUT_NO_TSAT".to_string(),
            SlotState::TimeAssigned(tsat) => format!("TSAT {}", tsat),
        },
    };
    format!("{} @ {}: {}", flight.callsign, airport, status)
}
