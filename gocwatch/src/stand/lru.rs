//! Least-recently-used stand pool rotation.
//!
//! Recency is persisted as `{ "LEBL": { "M30": 1700000000, ... } }`.
//! A stand that was never assigned counts as timestamp 0.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::MalformedInput;
use crate::persist::{load_json, save_json_atomic, StoreError};

/// Source of the current time in Unix seconds.
pub trait Clock: Send + Sync {
    /// Current time in seconds since the Unix epoch.
    fn now_secs(&self) -> i64;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_secs(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Last assignment time per airport and stand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LruState {
    airports: BTreeMap<String, BTreeMap<String, i64>>,
}

impl LruState {
    /// Load from a JSON document; absent file yields an empty state.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        load_json(path)
    }

    /// Persist via atomic replace.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        save_json_atomic(path, self)
    }

    /// Last assignment time of a stand, 0 if never assigned.
    pub fn last_used(&self, airport: &str, stand: &str) -> i64 {
        self.airports
            .get(airport)
            .and_then(|stands| stands.get(stand))
            .copied()
            .unwrap_or(0)
    }

    /// Number of stands with a recorded assignment at an airport.
    pub fn tracked(&self, airport: &str) -> usize {
        self.airports.get(airport).map_or(0, BTreeMap::len)
    }

    /// Pick the least recently used candidate and stamp it with `now`.
    ///
    /// Ties, including never-used stands, go to the earliest candidate.
    pub fn select(
        &mut self,
        airport: &str,
        candidates: &[String],
        now: i64,
    ) -> Result<String, MalformedInput> {
        let mut best: Option<(&String, i64)> = None;
        for candidate in candidates {
            let last = self.last_used(airport, candidate);
            match best {
                Some((_, best_ts)) if last >= best_ts => {}
                _ => best = Some((candidate, last)),
            }
        }

        let (chosen, _) = best.ok_or_else(|| MalformedInput::EmptyPool {
            airport: airport.to_string(),
        })?;
        let chosen = chosen.clone();

        self.airports
            .entry(airport.to_string())
            .or_default()
            .insert(chosen.clone(), now);

        Ok(chosen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn pool(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_unused_pool_picks_first() {
        let mut lru = LruState::default();
        assert_eq!(lru.select("LEVC", &pool(&["2", "3", "4"]), 100).unwrap(), "2");
        assert_eq!(lru.last_used("LEVC", "2"), 100);
    }

    #[test]
    fn test_selection_visible_to_next_call() {
        let mut lru = LruState::default();
        let candidates = pool(&["M1", "M2"]);
        assert_eq!(lru.select("LEMD", &candidates, 100).unwrap(), "M1");
        assert_eq!(lru.select("LEMD", &candidates, 100).unwrap(), "M2");
        // both stamped 100: tie goes to position
        assert_eq!(lru.select("LEMD", &candidates, 100).unwrap(), "M1");
    }

    #[test]
    fn test_oldest_wins() {
        let mut lru = LruState::default();
        lru.select("LEBL", &pool(&["A"]), 300).unwrap();
        lru.select("LEBL", &pool(&["B"]), 100).unwrap();
        lru.select("LEBL", &pool(&["C"]), 200).unwrap();

        assert_eq!(lru.select("LEBL", &pool(&["A", "B", "C"]), 400).unwrap(), "B");
    }

    #[test]
    fn test_airports_are_independent() {
        let mut lru = LruState::default();
        lru.select("LEBL", &pool(&["A"]), 300).unwrap();
        assert_eq!(lru.last_used("LEMD", "A"), 0);
        assert_eq!(lru.tracked("LEBL"), 1);
        assert_eq!(lru.tracked("LEMD"), 0);
    }

    #[test]
    fn test_empty_candidates_is_error() {
        let mut lru = LruState::default();
        assert!(matches!(
            lru.select("LEMD", &[], 1),
            Err(MalformedInput::EmptyPool { .. })
        ));
        assert_eq!(lru, LruState::default());
    }

    #[test]
    fn test_serialized_layout() {
        let mut lru = LruState::default();
        lru.select("LEBL", &pool(&["M30"]), 1_700_000_000).unwrap();
        let json = serde_json::to_string(&lru).unwrap();
        assert_eq!(json, r#"{"LEBL":{"M30":1700000000}}"#);

        let back: LruState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, lru);
    }

    proptest! {
        #[test]
        fn test_select_returns_oldest_candidate(
            stamps in proptest::collection::vec(0i64..5, 1..8),
            now in 10i64..20,
        ) {
            let candidates: Vec<String> = (0..stamps.len()).map(|i| format!("S{}", i)).collect();
            let mut lru = LruState::default();
            for (id, ts) in candidates.iter().zip(&stamps) {
                if *ts > 0 {
                    lru.select("LEMD", std::slice::from_ref(id), *ts).unwrap();
                }
            }

            let chosen = lru.select("LEMD", &candidates, now).unwrap();
            let index = candidates.iter().position(|c| *c == chosen);
            prop_assert!(index.is_some());

            let min = *stamps.iter().min().unwrap();
            let first_min = stamps.iter().position(|ts| *ts == min).unwrap();
            prop_assert_eq!(index.unwrap(), first_min);
            prop_assert_eq!(lru.last_used("LEMD", &chosen), now);
        }
    }
}
