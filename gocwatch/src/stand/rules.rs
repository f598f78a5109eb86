//! Loading stand rule sets.
//!
//! Rule sets live in one JSON file per airport, `<gates_dir>/<ICAO>.json`:
//!
//! ```json
//! {
//!   "rules": [
//!     {
//!       "priority": 10,
//!       "label": "T1 CONTACT",
//!       "match": { "callsign_prefix": ["HPF"], "aircraft_icao": ["A320", "A20N"] },
//!       "stands": { "type": "pool", "candidates": ["M30", "M31", "M32"] }
//!     },
//!     { "priority": 0, "name": "DEFAULT", "stands": { "type": "fixed", "stand": "R1" } }
//!   ]
//! }
//! ```

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use super::{normalize_candidates, MatchPredicate, Resolution, Rule, RuleSet, DEFAULT_RULE_LABEL};

/// Errors loading a rule set.
#[derive(Debug, Error)]
pub enum RuleSetError {
    /// No rule set is configured for the airport.
    #[error("no stand rules configured for {airport}")]
    Missing { airport: String },

    /// The rule file exists but could not be read.
    #[error("failed to read stand rules {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    /// The rule file is not a valid rule document.
    #[error("invalid stand rules {}: {reason}", .path.display())]
    Invalid { path: PathBuf, reason: String },
}

/// Provider of per-airport rule sets.
pub trait RuleSetSource: Send + Sync {
    /// Load the rule set for an airport.
    fn load_rule_set(&self, airport: &str) -> Result<RuleSet, RuleSetError>;
}

impl RuleSetSource for HashMap<String, RuleSet> {
    fn load_rule_set(&self, airport: &str) -> Result<RuleSet, RuleSetError> {
        self.get(airport)
            .cloned()
            .ok_or_else(|| RuleSetError::Missing {
                airport: airport.to_string(),
            })
    }
}

/// Reads `<dir>/<ICAO>.json` on every lookup, so edits apply without restart.
#[derive(Debug, Clone)]
pub struct JsonRuleSource {
    dir: PathBuf,
}

impl JsonRuleSource {
    /// Create a source over a gates directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the rule files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, airport: &str) -> Option<PathBuf> {
        let valid = !airport.is_empty() && airport.chars().all(|c| c.is_ascii_alphanumeric());
        valid.then(|| self.dir.join(format!("{}.json", airport.to_uppercase())))
    }
}

impl RuleSetSource for JsonRuleSource {
    fn load_rule_set(&self, airport: &str) -> Result<RuleSet, RuleSetError> {
        let missing = || RuleSetError::Missing {
            airport: airport.to_string(),
        };
        let path = self.path_for(airport).ok_or_else(missing)?;

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(missing()),
            Err(source) => return Err(RuleSetError::Read { path, source }),
        };

        let rule_set = parse_rule_set(airport, &content).map_err(|reason| {
            RuleSetError::Invalid {
                path: path.clone(),
                reason,
            }
        })?;

        if rule_set.is_empty() {
            return Err(missing());
        }
        Ok(rule_set)
    }
}

#[derive(Debug, Default, Deserialize)]
struct RuleSetDocument {
    #[serde(default)]
    rules: Vec<RuleDocument>,
}

#[derive(Debug, Deserialize)]
struct RuleDocument {
    #[serde(default, deserialize_with = "lenient_priority")]
    priority: i64,
    label: Option<String>,
    name: Option<String>,
    #[serde(rename = "match", default)]
    predicate: Option<MatchDocument>,
    #[serde(default)]
    stands: Option<StandsDocument>,
}

#[derive(Debug, Default, Deserialize)]
struct MatchDocument {
    callsign_prefix: Option<Vec<String>>,
    aircraft_icao: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
struct StandsDocument {
    #[serde(rename = "type")]
    kind: Option<String>,
    stand: Option<serde_json::Value>,
    candidates: Option<Vec<serde_json::Value>>,
}

/// Parse a rule document. Stand identifiers may be strings or numbers.
pub(crate) fn parse_rule_set(airport: &str, content: &str) -> Result<RuleSet, String> {
    let document: RuleSetDocument =
        serde_json::from_str(content).map_err(|e| e.to_string())?;

    let rules = document
        .rules
        .into_iter()
        .map(|doc| {
            let predicate = doc.predicate.unwrap_or_default();
            let stands = doc.stands.unwrap_or_default();
            let label = doc
                .label
                .or(doc.name)
                .map(|l| l.trim().to_string())
                .unwrap_or_else(|| DEFAULT_RULE_LABEL.to_string());

            let resolution = match stands.kind.as_deref().map(str::trim) {
                Some(kind) if kind.eq_ignore_ascii_case("fixed") => Resolution::Fixed(
                    stands
                        .stand
                        .as_ref()
                        .map(value_to_id)
                        .unwrap_or_default(),
                ),
                _ => Resolution::Pool(normalize_candidates(
                    stands.candidates.unwrap_or_default().iter().map(value_to_id),
                )),
            };

            Rule {
                priority: doc.priority,
                predicate: MatchPredicate {
                    callsign_prefixes: normalize_candidates(
                        predicate.callsign_prefix.unwrap_or_default(),
                    ),
                    aircraft_types: normalize_candidates(predicate.aircraft_icao.unwrap_or_default()),
                },
                resolution,
                label,
            }
        })
        .collect();

    Ok(RuleSet::new(airport.to_uppercase(), rules))
}

/// Accept `10`, `10.0` and `"10"`; fractions truncate toward zero, null is 0.
fn lenient_priority<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    let value = serde_json::Value::deserialize(deserializer)?;
    match &value {
        serde_json::Value::Null => Ok(0),
        serde_json::Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .ok_or_else(|| D::Error::custom(format!("invalid priority {}", n))),
        serde_json::Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| D::Error::custom(format!("invalid priority {:?}", s))),
        other => Err(D::Error::custom(format!("invalid priority {}", other))),
    }
}

fn value_to_id(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.trim().to_uppercase(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const LEVC_RULES: &str = r#"{
        "rules": [
            {
                "priority": 10,
                "label": " T1 CONTACT ",
                "match": { "callsign_prefix": ["hpf"], "aircraft_icao": ["A320"] },
                "stands": { "type": "pool", "candidates": ["2", 3, " 4 ", "", "2"] }
            },
            { "priority": 0, "name": "DEFAULT", "stands": { "type": "fixed", "stand": "r1" } },
            { "priority": -5 }
        ]
    }"#;

    #[test]
    fn test_parse_rule_document() {
        let set = parse_rule_set("levc", LEVC_RULES).unwrap();
        assert_eq!(set.airport(), "LEVC");
        assert_eq!(set.len(), 3);

        let ordered = set.ordered();
        assert_eq!(ordered[0].label, "T1 CONTACT");
        assert_eq!(ordered[0].predicate.callsign_prefixes, vec!["HPF"]);
        assert_eq!(
            ordered[0].resolution,
            Resolution::Pool(vec!["2".to_string(), "3".to_string(), "4".to_string()])
        );
        assert_eq!(ordered[1].label, "DEFAULT");
        assert_eq!(ordered[1].resolution, Resolution::Fixed("R1".to_string()));
        assert_eq!(ordered[2].label, DEFAULT_RULE_LABEL);
        assert_eq!(ordered[2].resolution, Resolution::Pool(Vec::new()));
    }

    #[test]
    fn test_priority_accepts_strings_and_floats() {
        let doc = r#"{
            "rules": [
                { "priority": "5", "label": "STRING", "stands": { "type": "fixed", "stand": "A" } },
                { "priority": 10.0, "label": "FLOAT", "stands": { "type": "fixed", "stand": "B" } },
                { "priority": null, "label": "NULL", "stands": { "type": "fixed", "stand": "C" } },
                { "priority": " 7 ", "label": "PADDED", "stands": { "type": "fixed", "stand": "D" } }
            ]
        }"#;
        let set = parse_rule_set("LEMD", doc).unwrap();
        let ordered: Vec<(i64, &str)> = set
            .ordered()
            .iter()
            .map(|r| (r.priority, r.label.as_str()))
            .collect();
        assert_eq!(
            ordered,
            vec![(10, "FLOAT"), (7, "PADDED"), (5, "STRING"), (0, "NULL")]
        );
    }

    #[test]
    fn test_priority_rejects_non_numeric() {
        let doc = r#"{ "rules": [ { "priority": "high" } ] }"#;
        assert!(parse_rule_set("LEMD", doc).is_err());
    }

    #[test]
    fn test_invalid_json() {
        assert!(parse_rule_set("LEVC", "{ rules: ").is_err());
    }

    #[test]
    fn test_json_source_reads_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("LEVC.json"), LEVC_RULES).unwrap();

        let source = JsonRuleSource::new(dir.path());
        let set = source.load_rule_set("LEVC").unwrap();
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_json_source_missing_file() {
        let dir = TempDir::new().unwrap();
        let source = JsonRuleSource::new(dir.path());
        assert!(matches!(
            source.load_rule_set("LEMD"),
            Err(RuleSetError::Missing { .. })
        ));
    }

    #[test]
    fn test_json_source_empty_document_is_missing() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("LEBL.json"), "{}").unwrap();

        let source = JsonRuleSource::new(dir.path());
        assert!(matches!(
            source.load_rule_set("LEBL"),
            Err(RuleSetError::Missing { .. })
        ));
    }

    #[test]
    fn test_json_source_invalid_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("LEBL.json"), "not json").unwrap();

        let source = JsonRuleSource::new(dir.path());
        assert!(matches!(
            source.load_rule_set("LEBL"),
            Err(RuleSetError::Invalid { .. })
        ));
    }

    #[test]
    fn test_json_source_rejects_path_like_codes() {
        let dir = TempDir::new().unwrap();
        let source = JsonRuleSource::new(dir.path());
        assert!(matches!(
            source.load_rule_set("../etc"),
            Err(RuleSetError::Missing { .. })
        ));
    }
}
