//! Slot source trait and CDM viewer client.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use super::parser::parse_slot_table;
use crate::error::FetchError;

/// `callsign -> raw time cell` for one airport.
pub type SlotTable = HashMap<String, String>;

/// Provider of per-airport departure slot tables.
pub trait SlotSource: Send + Sync {
    /// Fetch the current slot table of an airport.
    fn fetch_slot_table(
        &self,
        airport: &str,
    ) -> impl Future<Output = Result<SlotTable, FetchError>> + Send;
}

/// Scrapes the CDM viewer page of each airport.
pub struct CdmClient {
    http: reqwest::Client,
    url_template: String,
}

impl CdmClient {
    /// Create a client; `url_template` contains `{icao}`.
    pub fn new(url_template: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Http(e.to_string()))?;

        Ok(Self {
            http,
            url_template: url_template.into(),
        })
    }

    /// Page URL for an airport.
    pub fn url_for(&self, airport: &str) -> String {
        self.url_template.replace("{icao}", &airport.trim().to_uppercase())
    }
}

impl SlotSource for CdmClient {
    async fn fetch_slot_table(&self, airport: &str) -> Result<SlotTable, FetchError> {
        let url = self.url_for(airport);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| FetchError::Http(e.to_string()))?;

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Http(e.to_string()))?;

        let table = parse_slot_table(&body);
        tracing::debug!(airport = %airport, rows = table.len(), "CDM slot table fetched");
        Ok(table)
    }
}
