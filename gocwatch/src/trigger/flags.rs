//! Persisted one-shot flags.
//!
//! Stored as a JSON object of `"CALLSIGN|AIRPORT|kind": true` entries.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::persist::{load_json, save_json_atomic, StoreError};

/// Notification classes that fire at most once per key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConditionKind {
    /// First time a flight is seen online.
    Welcome,
    /// Flight within the trigger distance of its arrival airport.
    Arrival,
}

impl ConditionKind {
    /// Key segment for this condition.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionKind::Welcome => "welcome",
            ConditionKind::Arrival => "arrival",
        }
    }
}

impl FromStr for ConditionKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "welcome" => Ok(ConditionKind::Welcome),
            "arrival" => Ok(ConditionKind::Arrival),
            _ => Err(()),
        }
    }
}

/// Composite key `(callsign, airport, condition)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FlagKey {
    callsign: String,
    airport: String,
    kind: ConditionKind,
}

impl FlagKey {
    /// Welcome key: one per callsign.
    pub fn welcome(callsign: &str) -> Self {
        Self {
            callsign: callsign.trim().to_uppercase(),
            airport: String::new(),
            kind: ConditionKind::Welcome,
        }
    }

    /// Arrival key: one per callsign and arrival airport.
    pub fn arrival(callsign: &str, airport: &str) -> Self {
        Self {
            callsign: callsign.trim().to_uppercase(),
            airport: airport.trim().to_uppercase(),
            kind: ConditionKind::Arrival,
        }
    }

    /// Callsign part of the key.
    pub fn callsign(&self) -> &str {
        &self.callsign
    }

    /// Airport part of the key, empty for airport-less conditions.
    pub fn airport(&self) -> &str {
        &self.airport
    }

    /// Condition part of the key.
    pub fn kind(&self) -> ConditionKind {
        self.kind
    }
}

impl fmt::Display for FlagKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|{}", self.callsign, self.airport, self.kind.as_str())
    }
}

impl FromStr for FlagKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('|');
        let (Some(callsign), Some(airport), Some(kind), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(format!("malformed flag key '{}'", s));
        };

        let kind: ConditionKind = kind
            .parse()
            .map_err(|_| format!("unknown condition in flag key '{}'", s))?;
        if callsign.is_empty() {
            return Err(format!("empty callsign in flag key '{}'", s));
        }

        Ok(Self {
            callsign: callsign.to_string(),
            airport: airport.to_string(),
            kind,
        })
    }
}

/// Set of one-shot triggers that already fired. Keys are never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SentFlagStore {
    fired: BTreeSet<FlagKey>,
}

impl SentFlagStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a JSON document; absent file yields an empty store.
    ///
    /// Entries that are not `true` or whose key cannot be parsed are ignored.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let raw: BTreeMap<String, serde_json::Value> = load_json(path)?;
        let mut store = Self::new();

        for (key, value) in raw {
            if value != serde_json::Value::Bool(true) {
                continue;
            }
            match key.parse::<FlagKey>() {
                Ok(key) => {
                    store.fired.insert(key);
                }
                Err(reason) => {
                    tracing::warn!(path = %path.display(), %reason, "Ignoring flag entry");
                }
            }
        }

        Ok(store)
    }

    /// Persist via atomic replace.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let raw: BTreeMap<String, bool> = self
            .fired
            .iter()
            .map(|key| (key.to_string(), true))
            .collect();
        save_json_atomic(path, &raw)
    }

    /// Whether the trigger for this key has not fired yet.
    pub fn should_fire(&self, key: &FlagKey) -> bool {
        !self.fired.contains(key)
    }

    /// Record that the trigger fired. Returns true if the key is new.
    pub fn mark_fired(&mut self, key: FlagKey) -> bool {
        self.fired.insert(key)
    }

    /// Number of fired keys.
    pub fn len(&self) -> usize {
        self.fired.len()
    }

    /// Whether nothing has fired yet.
    pub fn is_empty(&self) -> bool {
        self.fired.is_empty()
    }
}
