//! Suppression of repeated identical errors.

use std::collections::HashMap;

/// Remembers the last error text per source.
///
/// A source reporting the same text again is not logged again until it has
/// succeeded once in between.
#[derive(Debug, Default)]
pub struct ErrorLatch {
    last: HashMap<String, String>,
}

impl ErrorLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure. Returns true when it should be logged.
    pub fn report(&mut self, source: &str, message: &str) -> bool {
        if self.last.get(source).is_some_and(|m| m == message) {
            return false;
        }
        self.last.insert(source.to_string(), message.to_string());
        true
    }

    /// Record a success. Returns true if the source was failing.
    pub fn clear(&mut self, source: &str) -> bool {
        self.last.remove(source).is_some()
    }

    /// Whether the source's last outcome was a failure.
    pub fn is_failing(&self, source: &str) -> bool {
        self.last.contains_key(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_error_logged_once() {
        let mut latch = ErrorLatch::new();
        assert!(latch.report("cdm:LEMD", "timeout"));
        assert!(!latch.report("cdm:LEMD", "timeout"));
        assert!(latch.report("cdm:LEMD", "HTTP 502"));
        assert!(latch.is_failing("cdm:LEMD"));
    }

    #[test]
    fn test_success_resets() {
        let mut latch = ErrorLatch::new();
        latch.report("vatsim", "timeout");
        assert!(latch.clear("vatsim"));
        assert!(!latch.clear("vatsim"));
        assert!(latch.report("vatsim", "timeout"));
    }

    #[test]
    fn test_sources_independent() {
        let mut latch = ErrorLatch::new();
        latch.report("cdm:LEMD", "timeout");
        assert!(latch.report("cdm:LEBL", "timeout"));
        assert!(!latch.is_failing("vatsim"));
    }
}
