use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

/// Hands out monotonically increasing request tokens and decides whether a
/// response may still reach the chart.
#[derive(Debug, Default)]
pub struct RequestTracker {
    latest: AtomicU64,
    rendered: Mutex<u64>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn latest(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    pub fn is_current(&self, token: u64) -> bool {
        token == self.latest()
    }

    /// Runs `apply` only if `token` is still the newest issued token and no
    /// newer response has been applied. Returns whether it ran.
    pub fn apply_if_current<F>(&self, token: u64, apply: F) -> bool
    where
        F: FnOnce(),
    {
        let mut rendered = self.rendered.lock().unwrap_or_else(PoisonError::into_inner);
        if !self.is_current(token) || token <= *rendered {
            return false;
        }
        apply();
        *rendered = token;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_increase() {
        let tracker = RequestTracker::new();

        let first = tracker.issue();
        let second = tracker.issue();

        assert!(second > first);
        assert!(tracker.is_current(second));
        assert!(!tracker.is_current(first));
    }

    #[test]
    fn test_stale_token_is_not_applied() {
        let tracker = RequestTracker::new();
        let first = tracker.issue();
        let second = tracker.issue();

        let mut applied = Vec::new();
        assert!(!tracker.apply_if_current(first, || applied.push(first)));
        assert!(tracker.apply_if_current(second, || applied.push(second)));

        assert_eq!(applied, vec![second]);
    }

    #[test]
    fn test_token_applies_once() {
        let tracker = RequestTracker::new();
        let token = tracker.issue();

        assert!(tracker.apply_if_current(token, || {}));
        assert!(!tracker.apply_if_current(token, || {}));
    }
}
