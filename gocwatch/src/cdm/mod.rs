//! Departure slot (TSAT) tables from the CDM viewer.

mod client;
mod parser;

pub use client::{CdmClient, SlotSource, SlotTable};
pub use parser::parse_slot_table;

/// CDM viewer page; `{icao}` is replaced by the airport code.
pub const DEFAULT_CDM_URL_TEMPLATE: &str = "https://cdm.vatsimspain.es/CDMViewer.php?airport={icao}";
