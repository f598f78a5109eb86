//! Rule predicate evaluation.

use super::Rule;
use crate::flight::{aircraft_type_code, alphabetic_prefix, normalize_callsign};

/// The flight attributes a rule can match on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchContext {
    /// Normalized callsign (`"HPF123"`).
    pub callsign: String,
    /// Leading alphabetic run of the callsign (`"HPF"`).
    pub prefix: String,
    /// ICAO aircraft type (`"A320"`), empty when unknown.
    pub aircraft_type: String,
}

impl MatchContext {
    /// Build a context from a raw callsign and aircraft type.
    pub fn new(callsign: &str, aircraft_type: &str) -> Self {
        Self {
            callsign: normalize_callsign(callsign),
            prefix: alphabetic_prefix(callsign),
            aircraft_type: aircraft_type_code(aircraft_type),
        }
    }
}

/// Whether a rule applies to the flight. Empty predicate lists are wildcards.
pub fn matches(rule: &Rule, context: &MatchContext) -> bool {
    field_matches(&rule.predicate.callsign_prefixes, &context.prefix)
        && field_matches(&rule.predicate.aircraft_types, &context.aircraft_type)
}

fn field_matches(allowed: &[String], value: &str) -> bool {
    allowed.is_empty()
        || allowed
            .iter()
            .any(|candidate| candidate.trim().eq_ignore_ascii_case(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_from_raw() {
        let ctx = MatchContext::new(" vlg123 ", "a20n/m");
        assert_eq!(ctx.callsign, "VLG123");
        assert_eq!(ctx.prefix, "VLG");
        assert_eq!(ctx.aircraft_type, "A20N");
    }

    #[test]
    fn test_empty_predicate_matches_all() {
        let rule = Rule::fixed(0, "ANY", "1");
        assert!(matches(&rule, &MatchContext::new("HPF1", "")));
        assert!(matches(&rule, &MatchContext::new("IBE3", "B738")));
    }

    #[test]
    fn test_prefix_predicate() {
        let rule = Rule::fixed(0, "HPF", "1").with_callsign_prefixes(["hpf"]);
        assert!(matches(&rule, &MatchContext::new("HPF123", "A320")));
        assert!(!matches(&rule, &MatchContext::new("VLG123", "A320")));
        // the whole alphabetic run must match, not a prefix of it
        assert!(!matches(&rule, &MatchContext::new("HPFX12", "A320")));
    }

    #[test]
    fn test_all_present_fields_must_match() {
        let rule = Rule::fixed(0, "HPF A320", "1")
            .with_callsign_prefixes(["HPF"])
            .with_aircraft_types(["A320"]);

        assert!(matches(&rule, &MatchContext::new("HPF1", "A320")));
        assert!(!matches(&rule, &MatchContext::new("HPF1", "B738")));
        assert!(!matches(&rule, &MatchContext::new("IBE1", "A320")));
    }

    #[test]
    fn test_unknown_type_fails_type_predicate() {
        let rule = Rule::fixed(0, "A320", "1").with_aircraft_types(["A320"]);
        assert!(!matches(&rule, &MatchContext::new("HPF1", "")));
    }
}
