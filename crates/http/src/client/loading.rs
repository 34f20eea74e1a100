//! In-flight request counter driving the loading indicator
//!
//! The counter is an explicit handle passed to the client factory, so tests
//! and independent consumers can each own one.

use std::sync::Arc;
use tokio::sync::watch;

/// Shared count of outstanding requests
#[derive(Debug, Clone)]
pub struct LoadingCounter {
    tx: Arc<watch::Sender<usize>>,
}

impl Default for LoadingCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadingCounter {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self { tx: Arc::new(tx) }
    }

    /// Count one request as started. The returned guard counts it as finished
    /// when dropped.
    pub fn begin(&self) -> InFlight {
        self.tx.send_modify(|count| *count += 1);
        InFlight {
            tx: Arc::clone(&self.tx),
        }
    }

    /// Number of outstanding requests
    pub fn current(&self) -> usize {
        *self.tx.borrow()
    }

    pub fn is_loading(&self) -> bool {
        self.current() > 0
    }

    /// Watch the count, e.g. to toggle a spinner
    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.tx.subscribe()
    }
}

/// Guard for one outstanding request
#[derive(Debug)]
#[must_use = "dropping the guard immediately marks the request as finished"]
pub struct InFlight {
    tx: Arc<watch::Sender<usize>>,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.tx
            .send_modify(|count| *count = count.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_balances_counter() {
        let counter = LoadingCounter::new();
        assert!(!counter.is_loading());

        let first = counter.begin();
        let second = counter.begin();
        assert_eq!(counter.current(), 2);

        drop(first);
        assert_eq!(counter.current(), 1);
        drop(second);
        assert_eq!(counter.current(), 0);
    }

    #[test]
    fn test_clones_share_state() {
        let counter = LoadingCounter::new();
        let clone = counter.clone();
        let _guard = clone.begin();
        assert_eq!(counter.current(), 1);
    }

    #[test]
    fn test_independent_counters() {
        let a = LoadingCounter::new();
        let b = LoadingCounter::new();
        let _guard = a.begin();
        assert_eq!(a.current(), 1);
        assert_eq!(b.current(), 0);
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let counter = LoadingCounter::new();
        let mut rx = counter.subscribe();

        let guard = counter.begin();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), 1);

        drop(guard);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), 0);
    }
}
