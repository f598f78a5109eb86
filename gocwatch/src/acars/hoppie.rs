//! Hoppie telex client.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

/// A telex could not be delivered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    /// Request failed or returned a non-success status.
    #[error("telex request failed: {0}")]
    Http(String),

    /// The network answered with an `error` response.
    #[error("telex rejected: {0}")]
    Rejected(String),
}

/// Delivers free-text messages to a station.
pub trait MessageSink: Send + Sync {
    /// Send `text` to `destination`; returns the network's acknowledgement.
    fn deliver(
        &self,
        destination: &str,
        text: &str,
    ) -> impl Future<Output = Result<String, DeliveryError>> + Send;
}

/// Normalize line endings to CRLF and trim surrounding whitespace.
pub fn to_crlf(text: &str) -> String {
    text.trim()
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\n', "\r\n")
}

/// Classify a Hoppie response body.
pub fn check_response(body: &str) -> Result<String, DeliveryError> {
    let body = body.trim();
    if body
        .get(..5)
        .is_some_and(|head| head.eq_ignore_ascii_case("error"))
    {
        return Err(DeliveryError::Rejected(body.to_string()));
    }
    Ok(body.to_string())
}

/// Posts `type=telex` packets to the Hoppie connect endpoint.
pub struct HoppieClient {
    http: reqwest::Client,
    url: String,
    logon: String,
    station: String,
}

impl HoppieClient {
    /// Create a client sending as `station`.
    pub fn new(
        url: impl Into<String>,
        logon: impl Into<String>,
        station: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, DeliveryError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DeliveryError::Http(e.to_string()))?;

        Ok(Self {
            http,
            url: url.into(),
            logon: logon.into(),
            station: station.into().trim().to_uppercase(),
        })
    }

    /// Sending station.
    pub fn station(&self) -> &str {
        &self.station
    }

    fn form(&self, destination: &str, text: &str) -> [(&'static str, String); 5] {
        [
            ("logon", self.logon.clone()),
            ("from", self.station.clone()),
            ("to", destination.trim().to_uppercase()),
            ("type", "telex".to_string()),
            ("packet", to_crlf(text)),
        ]
    }
}

impl MessageSink for HoppieClient {
    async fn deliver(&self, destination: &str, text: &str) -> Result<String, DeliveryError> {
        let form = self.form(destination, text);

        let response = self
            .http
            .post(&self.url)
            .form(&form)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| DeliveryError::Http(e.to_string()))?;

        let body = response
            .text()
            .await
            .map_err(|e| DeliveryError::Http(e.to_string()))?;

        let ack = check_response(&body)?;
        tracing::debug!(to = %destination, ack = %ack, "Telex delivered");
        Ok(ack)
    }
}

#[cfg(test)]
mod tests {
    use super::super::{DEFAULT_HOPPIE_URL, DEFAULT_STATION};
    use super::*;

    #[test]
    fn test_to_crlf() {
        assert_eq!(to_crlf("A\nB"), "A\r\nB");
        assert_eq!(to_crlf("A\r\nB\rC"), "A\r\nB\r\nC");
        assert_eq!(to_crlf("  \nHPF GOC\n  "), "HPF GOC");
    }

    #[test]
    fn test_check_response() {
        assert_eq!(check_response("ok\n").unwrap(), "ok");
        assert_eq!(check_response("ok {HPF1 telex}").unwrap(), "ok {HPF1 telex}");
        assert!(matches!(
            check_response("error {illegal logon code}"),
            Err(DeliveryError::Rejected(_))
        ));
        assert!(matches!(
            check_response(" ERROR {callsign offline}"),
            Err(DeliveryError::Rejected(_))
        ));
    }

    #[test]
    fn test_form_fields() {
        let client = HoppieClient::new(
            DEFAULT_HOPPIE_URL,
            "secret",
            "hpfgoc",
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(client.station(), DEFAULT_STATION);

        let form = client.form(" hpf123", "LINE 1\nLINE 2");
        assert_eq!(form[0], ("logon", "secret".to_string()));
        assert_eq!(form[1], ("from", "HPFGOC".to_string()));
        assert_eq!(form[2], ("to", "HPF123".to_string()));
        assert_eq!(form[3], ("type", "telex".to_string()));
        assert_eq!(form[4], ("packet", "LINE 1\r\nLINE 2".to_string()));
    }
}
