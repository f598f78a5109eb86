//! Departure slot (TSAT) state tracking.

use std::collections::{HashMap, HashSet};
use std::fmt;

/// Cell values that mean "listed, but no time yet".
const PLACEHOLDERS: &[&str] = &["", "-", "--", "----", "—", "N/A", "NA"];

/// Whether a raw slot cell carries no usable time.
pub fn is_placeholder(raw: &str) -> bool {
    let trimmed = raw.trim();
    PLACEHOLDERS
        .iter()
        .any(|placeholder| placeholder.eq_ignore_ascii_case(trimmed))
}

/// Published slot status of one flight at one airport.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum SlotState {
    /// Flight is not listed in the slot table.
    #[default]
    NoRecord,
    /// Flight is listed but has no time yet.
    RecordNoTime,
    /// Flight has a published time.
    TimeAssigned(String),
}

impl SlotState {
    /// Classify a slot table lookup result.
    pub fn classify(raw: Option<&str>) -> Self {
        match raw {
            None => SlotState::NoRecord,
            Some(value) if is_placeholder(value) => SlotState::RecordNoTime,
            Some(value) => SlotState::TimeAssigned(value.trim().to_string()),
        }
    }

    /// Published time, if any.
    pub fn time(&self) -> Option<&str> {
        match self {
            SlotState::TimeAssigned(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for SlotState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotState::NoRecord => write!(f, "not listed"),
            SlotState::RecordNoTime => write!(f, "listed, no time"),
            SlotState::TimeAssigned(value) => write!(f, "TSAT {}", value),
        }
    }
}

/// A change in slot state between two observations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotTransition {
    pub previous: SlotState,
    pub current: SlotState,
}

impl SlotTransition {
    /// Transitions into `NoRecord` are only logged.
    pub fn notifies(&self) -> bool {
        self.current != SlotState::NoRecord
    }
}

/// Last observed slot state per `(callsign, airport)`.
#[derive(Debug, Default)]
pub struct TransitionLog {
    last: HashMap<(String, String), SlotState>,
}

impl TransitionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an observation; returns the transition if the state changed.
    ///
    /// Unobserved pairs start in `NoRecord`.
    pub fn observe(
        &mut self,
        callsign: &str,
        airport: &str,
        state: SlotState,
    ) -> Option<SlotTransition> {
        let key = (callsign.to_string(), airport.to_string());
        let previous = self.last.get(&key).cloned().unwrap_or_default();
        if previous == state {
            return None;
        }

        self.last.insert(key, state.clone());
        Some(SlotTransition {
            previous,
            current: state,
        })
    }

    /// Last observed state, `NoRecord` if never observed.
    pub fn current(&self, callsign: &str, airport: &str) -> SlotState {
        self.last
            .get(&(callsign.to_string(), airport.to_string()))
            .cloned()
            .unwrap_or_default()
    }

    /// Forget every pair whose callsign is not in `online`.
    ///
    /// Returns the number of pairs removed. A pruned flight that comes back
    /// starts again from `NoRecord`.
    pub fn retain_online<'a, I>(&mut self, online: I) -> usize
    where
        I: IntoIterator<Item = &'a str>,
    {
        let online: HashSet<&str> = online.into_iter().collect();
        let before = self.last.len();
        self.last
            .retain(|(callsign, _), _| online.contains(callsign.as_str()));
        before - self.last.len()
    }

    /// Number of tracked pairs.
    pub fn len(&self) -> usize {
        self.last.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders() {
        for raw in ["", " ", "-", "--", "----", "—", "n/a", "N/A", "na", " NA "] {
            assert!(is_placeholder(raw), "{:?}", raw);
        }
        assert!(!is_placeholder("1230"));
        assert!(!is_placeholder("---"));
    }

    #[test]
    fn test_classify() {
        assert_eq!(SlotState::classify(None), SlotState::NoRecord);
        assert_eq!(SlotState::classify(Some("--")), SlotState::RecordNoTime);
        assert_eq!(
            SlotState::classify(Some(" 1230 ")),
            SlotState::TimeAssigned("1230".to_string())
        );
        assert_eq!(SlotState::classify(Some("1230")).time(), Some("1230"));
    }

    #[test]
    fn test_initial_no_record_is_silent() {
        let mut log = TransitionLog::new();
        assert!(log.observe("HPF1", "LEMD", SlotState::NoRecord).is_none());
        assert!(log.is_empty());
    }

    #[test]
    fn test_same_tuple_does_not_repeat() {
        let mut log = TransitionLog::new();
        let first = log
            .observe("HPF1", "LEMD", SlotState::TimeAssigned("1230".into()))
            .unwrap();
        assert!(first.notifies());
        assert_eq!(first.previous, SlotState::NoRecord);

        assert!(log
            .observe("HPF1", "LEMD", SlotState::TimeAssigned("1230".into()))
            .is_none());
    }

    #[test]
    fn test_value_change_notifies() {
        let mut log = TransitionLog::new();
        log.observe("HPF1", "LEMD", SlotState::TimeAssigned("1230".into()));
        let change = log
            .observe("HPF1", "LEMD", SlotState::TimeAssigned("1245".into()))
            .unwrap();

        assert!(change.notifies());
        assert_eq!(change.previous.time(), Some("1230"));
        assert_eq!(change.current.time(), Some("1245"));
    }

    #[test]
    fn test_pending_then_assigned() {
        let mut log = TransitionLog::new();
        let pending = log.observe("HPF1", "LEBL", SlotState::RecordNoTime).unwrap();
        assert!(pending.notifies());

        let assigned = log
            .observe("HPF1", "LEBL", SlotState::TimeAssigned("0915".into()))
            .unwrap();
        assert_eq!(assigned.previous, SlotState::RecordNoTime);
    }

    #[test]
    fn test_drop_to_no_record_is_logged_only() {
        let mut log = TransitionLog::new();
        log.observe("HPF1", "LEMD", SlotState::TimeAssigned("1230".into()));
        let gone = log.observe("HPF1", "LEMD", SlotState::NoRecord).unwrap();
        assert!(!gone.notifies());
        assert_eq!(log.current("HPF1", "LEMD"), SlotState::NoRecord);

        // reappearing with the same time announces again
        assert!(log
            .observe("HPF1", "LEMD", SlotState::TimeAssigned("1230".into()))
            .unwrap()
            .notifies());
    }

    #[test]
    fn test_airports_tracked_separately() {
        let mut log = TransitionLog::new();
        log.observe("HPF1", "LEMD", SlotState::RecordNoTime);
        assert!(log.observe("HPF1", "LEBL", SlotState::RecordNoTime).is_some());
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_retain_online_prunes_departed_callsigns() {
        let mut log = TransitionLog::new();
        log.observe("HPF1", "LEMD", SlotState::TimeAssigned("1230".into()));
        log.observe("HPF1", "LEBL", SlotState::RecordNoTime);
        log.observe("HPF2", "LEMD", SlotState::TimeAssigned("1300".into()));

        assert_eq!(log.retain_online(["HPF2", "HPF9"]), 2);
        assert_eq!(log.len(), 1);
        assert_eq!(log.current("HPF1", "LEMD"), SlotState::NoRecord);

        // back online: announced again
        let transition = log
            .observe("HPF1", "LEMD", SlotState::TimeAssigned("1230".into()))
            .unwrap();
        assert!(transition.notifies());
    }
}
