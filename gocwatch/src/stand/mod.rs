//! Rule-based stand assignment for arriving flights.
//!
//! Each base airport has a [`RuleSet`]: an ordered list of rules, each with a
//! match predicate (callsign prefixes, aircraft types) and a resolution
//! (a fixed stand or a pool rotated by least-recent use).
//!
//! # Algorithm
//!
//! 1. Load the airport's rule set from the [`RuleSetSource`]
//! 2. Order rules by priority, highest first, keeping declaration order on ties
//! 3. Take the first matching rule that yields a usable stand:
//!    - `Fixed` with a blank stand falls through to the next rule
//!    - `Pool` with no usable candidates falls through to the next rule
//!    - `Pool` otherwise picks the least recently used candidate
//! 4. If nothing resolves, or the airport has no rules, answer `TBD / APRON`
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use gocwatch::stand::{LruState, Rule, RuleSet, StandAllocator};
//!
//! let rules = RuleSet::new("LEMD", vec![
//!     Rule::pool(10, "T4 CONTACT", ["M1", "M2"]).with_callsign_prefixes(["HPF"]),
//! ]);
//! let mut source = HashMap::new();
//! source.insert("LEMD".to_string(), rules);
//!
//! let mut allocator = StandAllocator::new(source, LruState::default());
//! let first = allocator.assign("LEMD", "HPF100", "A320");
//! let second = allocator.assign("LEMD", "HPF200", "A320");
//! assert_eq!(first.stand, "M1");
//! assert_eq!(second.stand, "M2");
//! ```

mod lru;
mod matcher;
mod rules;

use std::path::Path;

use crate::persist::StoreError;

pub use lru::{Clock, LruState, SystemClock};
pub use matcher::{matches, MatchContext};
pub use rules::{JsonRuleSource, RuleSetError, RuleSetSource};

/// Stand reported when no rule resolves.
pub const FALLBACK_STAND: &str = "TBD";

/// Label reported when no rule resolves.
pub const FALLBACK_LABEL: &str = "APRON";

/// Label used when a rule carries neither `label` nor `name`.
pub const DEFAULT_RULE_LABEL: &str = "EST STAND";

/// Which flights a rule applies to. Empty lists match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchPredicate {
    /// Alphabetic callsign prefixes (`"HPF"`, `"VLG"`).
    pub callsign_prefixes: Vec<String>,
    /// ICAO aircraft type designators (`"A320"`, `"B738"`).
    pub aircraft_types: Vec<String>,
}

/// How a matching rule picks a stand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Always the same stand. Blank means "not usable".
    Fixed(String),
    /// Least recently used stand from the candidates.
    Pool(Vec<String>),
}

/// A single stand rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Higher priorities are evaluated first.
    pub priority: i64,
    /// Match predicate.
    pub predicate: MatchPredicate,
    /// Stand resolution.
    pub resolution: Resolution,
    /// Label reported alongside the stand (`"T1 CONTACT"`).
    pub label: String,
}

impl Rule {
    /// Create a fixed-stand rule that matches every flight.
    pub fn fixed(priority: i64, label: impl Into<String>, stand: impl Into<String>) -> Self {
        Self {
            priority,
            predicate: MatchPredicate::default(),
            resolution: Resolution::Fixed(stand.into()),
            label: label.into(),
        }
    }

    /// Create a pool rule that matches every flight.
    ///
    /// Candidates are trimmed, uppercased and deduplicated; blank entries dropped.
    pub fn pool<I, S>(priority: i64, label: impl Into<String>, candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            priority,
            predicate: MatchPredicate::default(),
            resolution: Resolution::Pool(normalize_candidates(candidates)),
            label: label.into(),
        }
    }

    /// Restrict the rule to the given callsign prefixes.
    pub fn with_callsign_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.predicate.callsign_prefixes = normalize_candidates(prefixes);
        self
    }

    /// Restrict the rule to the given aircraft types.
    pub fn with_aircraft_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.predicate.aircraft_types = normalize_candidates(types);
        self
    }
}

/// The stand rules of one airport.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    airport: String,
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Create a rule set in declaration order.
    pub fn new(airport: impl Into<String>, rules: Vec<Rule>) -> Self {
        Self {
            airport: airport.into(),
            rules,
        }
    }

    /// Airport ICAO code.
    pub fn airport(&self) -> &str {
        &self.airport
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the rule set has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules in evaluation order: priority descending, declaration order on ties.
    pub fn ordered(&self) -> Vec<&Rule> {
        let mut ordered: Vec<&Rule> = self.rules.iter().collect();
        // sort_by is stable
        ordered.sort_by(|a, b| b.priority.cmp(&a.priority));
        ordered
    }
}

/// A resolved stand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// Stand identifier.
    pub stand: String,
    /// Rule label.
    pub label: String,
}

impl Assignment {
    /// The `TBD / APRON` answer used when nothing resolves.
    pub fn fallback() -> Self {
        Self {
            stand: FALLBACK_STAND.to_string(),
            label: FALLBACK_LABEL.to_string(),
        }
    }

    /// Whether this is the fallback answer.
    pub fn is_fallback(&self) -> bool {
        self.stand == FALLBACK_STAND && self.label == FALLBACK_LABEL
    }
}

/// Trim, uppercase and deduplicate identifiers, dropping blanks.
pub fn normalize_candidates<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for value in values {
        let value = value.as_ref().trim().to_uppercase();
        if !value.is_empty() && !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

/// Assigns stands from per-airport rule sets, owning the pool recency state.
pub struct StandAllocator<R> {
    source: R,
    lru: LruState,
    clock: Box<dyn Clock>,
    dirty: bool,
}

impl<R: RuleSetSource> StandAllocator<R> {
    /// Create an allocator using the system clock.
    pub fn new(source: R, lru: LruState) -> Self {
        Self {
            source,
            lru,
            clock: Box::new(SystemClock),
            dirty: false,
        }
    }

    /// Replace the clock used to stamp pool assignments.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Assign a stand, falling back to `TBD / APRON` on any rule set error.
    pub fn assign(&mut self, airport: &str, callsign: &str, aircraft_type: &str) -> Assignment {
        match self.try_assign(airport, callsign, aircraft_type) {
            Ok(assignment) => assignment,
            Err(e @ RuleSetError::Missing { .. }) => {
                tracing::warn!(airport, callsign, error = %e, "No stand rules, using fallback");
                Assignment::fallback()
            }
            Err(e) => {
                tracing::error!(airport, callsign, error = %e, "Stand rules unusable, using fallback");
                Assignment::fallback()
            }
        }
    }

    /// Assign a stand, surfacing rule set errors.
    ///
    /// Returns the fallback assignment (not an error) when the rule set loads
    /// but no rule yields a usable stand.
    pub fn try_assign(
        &mut self,
        airport: &str,
        callsign: &str,
        aircraft_type: &str,
    ) -> Result<Assignment, RuleSetError> {
        let rule_set = self.source.load_rule_set(airport)?;
        let context = MatchContext::new(callsign, aircraft_type);

        for rule in rule_set.ordered() {
            if !matches(rule, &context) {
                continue;
            }

            match &rule.resolution {
                Resolution::Fixed(stand) => {
                    let stand = stand.trim().to_uppercase();
                    if !stand.is_empty() {
                        return Ok(Assignment {
                            stand,
                            label: rule.label.clone(),
                        });
                    }
                }
                Resolution::Pool(candidates) => {
                    let candidates = normalize_candidates(candidates);
                    if candidates.is_empty() {
                        continue;
                    }
                    let now = self.clock.now_secs();
                    match self.lru.select(airport, &candidates, now) {
                        Ok(stand) => {
                            self.dirty = true;
                            return Ok(Assignment {
                                stand,
                                label: rule.label.clone(),
                            });
                        }
                        Err(e) => {
                            tracing::warn!(airport, error = %e, "Skipping pool rule");
                        }
                    }
                }
            }
        }

        tracing::debug!(airport, callsign, "No stand rule resolved");
        Ok(Assignment::fallback())
    }

    /// Pool recency state.
    pub fn lru(&self) -> &LruState {
        &self.lru
    }

    /// Whether the recency state changed since it was last persisted.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Persist the recency state if it changed. Returns whether a write happened.
    ///
    /// A failed write leaves the state dirty so the next call retries.
    pub fn persist(&mut self, path: &Path) -> Result<bool, StoreError> {
        if !self.dirty {
            return Ok(false);
        }
        self.lru.save(path)?;
        self.dirty = false;
        Ok(true)
    }
}
