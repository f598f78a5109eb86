//! Telex message templates.
//!
//! Lines are joined with `\n`; the delivery client converts to CRLF.

use crate::stand::Assignment;

/// Default first line of every generated telex.
pub const DEFAULT_HEADER: &str = "HPF GOC";

/// Builds the automatic telex texts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplates {
    header: String,
}

impl Default for MessageTemplates {
    fn default() -> Self {
        Self::new(DEFAULT_HEADER)
    }
}

impl MessageTemplates {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into().trim().to_uppercase(),
        }
    }

    /// Header line.
    pub fn header(&self) -> &str {
        &self.header
    }

    /// First-seen greeting.
    pub fn welcome(&self, callsign: &str) -> String {
        [
            self.header.as_str(),
            "WELCOME / IZU",
            &format!("CALLSIGN {}", callsign),
            "GOC READY AND ONLINE",
            "SEND READY WHEN PUSH-READY",
            "CONTACT GOC ANYTIME VIA TELEX",
        ]
        .join("\n")
    }

    /// Arrival package with the predicted stand.
    pub fn arrival_package(
        &self,
        callsign: &str,
        airport: &str,
        distance_nm: f64,
        assignment: &Assignment,
    ) -> String {
        [
            self.header.as_str(),
            "ARR PKG INFO",
            &format!("CALLSIGN {}", callsign),
            &format!("ARR {}", airport),
            &format!("DIST {:.0}NM", distance_nm),
            &format!(
                "EST STAND: {} ({}) - SUBJ CHG",
                assignment.stand, assignment.label
            ),
            "AFTER LANDING: VACATE ASAP / FOLLOW ATC",
        ]
        .join("\n")
    }

    /// Published or changed departure slot.
    pub fn tsat_update(&self, airport: &str, tsat: &str) -> String {
        [
            self.header.as_str(),
            "TSAT UPDATE",
            &format!("APT {}", airport),
            &format!("TSAT {}", tsat),
        ]
        .join("\n")
    }

    /// Listed in the slot table without a time yet.
    pub fn tsat_pending(&self, airport: &str) -> String {
        [
            self.header.as_str(),
            "TSAT PENDING",
            &format!("APT {}", airport),
            "CDM RECORD RECEIVED / TSAT NOT YET ASSIGNED",
        ]
        .join("\n")
    }

    /// Link test message.
    pub fn ping(&self) -> String {
        format!("{} TEST MESSAGE", self.header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_welcome() {
        let text = MessageTemplates::default().welcome("HPF123");
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "HPF GOC");
        assert_eq!(lines[2], "CALLSIGN HPF123");
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn test_arrival_package_rounds_distance() {
        let assignment = Assignment {
            stand: "M1".to_string(),
            label: "T4 CONTACT".to_string(),
        };
        let text = MessageTemplates::default().arrival_package("HPF1", "LEMD", 79.6, &assignment);
        assert!(text.contains("ARR LEMD"));
        assert!(text.contains("DIST 80NM"));
        assert!(text.contains("EST STAND: M1 (T4 CONTACT) - SUBJ CHG"));
    }

    #[test]
    fn test_tsat_messages() {
        let templates = MessageTemplates::new("hpf ops");
        assert_eq!(
            templates.tsat_update("LEVC", "1230"),
            "HPF OPS\nTSAT UPDATE\nAPT LEVC\nTSAT 1230"
        );
        assert!(templates.tsat_pending("LEVC").contains("TSAT PENDING"));
        assert_eq!(templates.ping(), "HPF OPS TEST MESSAGE");
    }
}
