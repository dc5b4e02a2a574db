//! Location tracker.
//!
//! Keeps the last known GPS fix and fans out updates to subscribers. No
//! smoothing happens here: fixes are trusted as delivered, with accuracy
//! filtering (minimum distance/time between fixes) left to the upstream
//! location source.

use crate::geo::Coordinate;
use crate::subscription::{SubscriberRegistry, Subscription};

pub struct LocationTracker {
    last_known: Option<Coordinate>,
    subscribers: SubscriberRegistry<Coordinate>,
}

impl LocationTracker {
    pub fn new() -> Self {
        Self {
            last_known: None,
            subscribers: SubscriberRegistry::new(),
        }
    }

    /// Last known coordinate, no side effects.
    pub fn snapshot(&self) -> Option<Coordinate> {
        self.last_known
    }

    /// Store a new fix and fan it out in registration order. Invalid
    /// coordinates are dropped, not propagated. Returns the accepted
    /// fix, or `None` when it was dropped.
    pub fn ingest_location(&mut self, coordinate: Coordinate) -> Option<Coordinate> {
        if !coordinate.is_valid() {
            log::warn!("dropping invalid location fix: {:?}", coordinate);
            return None;
        }
        self.last_known = Some(coordinate);
        self.subscribers.notify(&coordinate);
        Some(coordinate)
    }

    pub fn subscribe<F>(&mut self, callback: F) -> Subscription
    where
        F: FnMut(&Coordinate) + Send + 'static,
    {
        self.subscribers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, subscription: &Subscription) {
        self.subscribers.unsubscribe(subscription);
    }

    /// Tear down: clear subscribers and the stored fix. Idempotent and
    /// safe to call when never started.
    pub fn shutdown(&mut self) {
        self.subscribers.clear();
        self.last_known = None;
    }
}

impl Default for LocationTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_snapshot_starts_empty() {
        let tracker = LocationTracker::new();
        assert!(tracker.snapshot().is_none());
    }

    #[test]
    fn test_ingest_updates_snapshot_and_notifies() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut tracker = LocationTracker::new();

        let seen2 = Arc::clone(&seen);
        tracker.subscribe(move |c: &Coordinate| seen2.lock().unwrap().push(*c));

        let fix = Coordinate::new(13.0443132, 77.5733936);
        let _ = tracker.ingest_location(fix);
        assert_eq!(tracker.snapshot(), Some(fix));
        assert_eq!(*seen.lock().unwrap(), vec![fix]);
    }

    #[test]
    fn test_invalid_fix_dropped() {
        let mut tracker = LocationTracker::new();
        let _ = tracker.ingest_location(Coordinate::new(f64::NAN, 0.0));
        let _ = tracker.ingest_location(Coordinate::new(120.0, 0.0));
        assert!(tracker.snapshot().is_none());
    }

    #[test]
    fn test_unsubscribed_callback_not_invoked() {
        let count = Arc::new(Mutex::new(0u32));
        let mut tracker = LocationTracker::new();

        let count2 = Arc::clone(&count);
        let sub = tracker.subscribe(move |_| *count2.lock().unwrap() += 1);

        let _ = tracker.ingest_location(Coordinate::new(1.0, 1.0));
        tracker.unsubscribe(&sub);
        let _ = tracker.ingest_location(Coordinate::new(2.0, 2.0));
        assert_eq!(*count.lock().unwrap(), 1);
    }

    #[test]
    fn test_shutdown_idempotent() {
        let mut tracker = LocationTracker::new();
        let _ = tracker.ingest_location(Coordinate::new(1.0, 1.0));
        tracker.shutdown();
        tracker.shutdown();
        assert!(tracker.snapshot().is_none());
    }
}
