//! The tracked-window map.
//!
//! One record per window handle the engine has seen: the last observed
//! rectangle and title. The map is bounded; when full, inserting a new
//! handle evicts the least-recently-accessed record so the engine can
//! run indefinitely against an unbounded stream of short-lived windows.

use std::collections::HashMap;

use crate::Rect;

/// Default capacity of the tracked-window map.
pub const DEFAULT_CAPACITY: usize = 512;

/// Last observed state of one window.
#[derive(Debug, Clone)]
pub struct TrackedWindow {
    pub rect: Rect,
    pub title: String,
    stamp: u64,
}

/// Bounded, recency-evicting map of handle -> [`TrackedWindow`].
#[derive(Debug)]
pub struct WindowTracker {
    entries: HashMap<usize, TrackedWindow>,
    capacity: usize,
    clock: u64,
}

impl WindowTracker {
    /// Creates a tracker holding at most `capacity` records.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity.min(DEFAULT_CAPACITY)),
            capacity: capacity.max(1),
            clock: 0,
        }
    }

    /// Records the current rect and title for `handle`.
    ///
    /// Returns the previously observed rect, or `None` on first
    /// sighting. May evict the least-recently-accessed record to make
    /// room.
    pub fn record(&mut self, handle: usize, rect: Rect, title: &str) -> Option<Rect> {
        self.clock += 1;
        let stamp = self.clock;

        if let Some(entry) = self.entries.get_mut(&handle) {
            let previous = entry.rect;
            entry.rect = rect;
            if entry.title != title {
                entry.title = title.to_owned();
            }
            entry.stamp = stamp;
            return Some(previous);
        }

        if self.entries.len() >= self.capacity {
            self.evict_oldest();
        }
        self.entries.insert(
            handle,
            TrackedWindow {
                rect,
                title: title.to_owned(),
                stamp,
            },
        );
        None
    }

    /// Returns the record for `handle` without refreshing its recency.
    pub fn get(&self, handle: usize) -> Option<&TrackedWindow> {
        self.entries.get(&handle)
    }

    pub fn contains(&self, handle: usize) -> bool {
        self.entries.contains_key(&handle)
    }

    /// Drops every record whose handle fails `is_alive`. Called from
    /// the periodic cleanup pass with a liveness probe.
    pub fn retain_alive(&mut self, mut is_alive: impl FnMut(usize) -> bool) {
        self.entries.retain(|&handle, _| is_alive(handle));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, e)| e.stamp)
            .map(|(&handle, _)| handle);
        if let Some(handle) = oldest {
            self.entries.remove(&handle);
        }
    }
}

impl Default for WindowTracker {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(n: i32) -> Rect {
        Rect::new(n, n, 100, 100)
    }

    #[test]
    fn first_sighting_returns_none() {
        let mut tracker = WindowTracker::new(8);
        assert_eq!(tracker.record(1, rect(0), "a"), None);
        assert!(tracker.contains(1));
    }

    #[test]
    fn second_sighting_returns_previous_rect() {
        let mut tracker = WindowTracker::new(8);
        tracker.record(1, rect(0), "a");
        assert_eq!(tracker.record(1, rect(5), "a"), Some(rect(0)));
        assert_eq!(tracker.get(1).unwrap().rect, rect(5));
    }

    #[test]
    fn title_updates_follow_the_window() {
        let mut tracker = WindowTracker::new(8);
        tracker.record(1, rect(0), "before");
        tracker.record(1, rect(0), "after");
        assert_eq!(tracker.get(1).unwrap().title, "after");
    }

    #[test]
    fn eviction_removes_exactly_the_least_recent() {
        let mut tracker = WindowTracker::new(3);
        tracker.record(1, rect(1), "");
        tracker.record(2, rect(2), "");
        tracker.record(3, rect(3), "");

        // Touch 1 so 2 becomes the least recently accessed.
        tracker.record(1, rect(1), "");
        tracker.record(4, rect(4), "");

        assert_eq!(tracker.len(), 3);
        assert!(tracker.contains(1));
        assert!(!tracker.contains(2));
        assert!(tracker.contains(3));
        assert!(tracker.contains(4));
    }

    #[test]
    fn size_never_exceeds_capacity() {
        let mut tracker = WindowTracker::new(4);
        for handle in 0..100 {
            tracker.record(handle, rect(0), "");
            assert!(tracker.len() <= 4);
        }
        assert_eq!(tracker.len(), 4);
    }

    #[test]
    fn retain_alive_drops_dead_handles() {
        let mut tracker = WindowTracker::new(8);
        for handle in 1..=4 {
            tracker.record(handle, rect(0), "");
        }
        tracker.retain_alive(|handle| handle % 2 == 0);
        assert_eq!(tracker.len(), 2);
        assert!(tracker.contains(2));
        assert!(tracker.contains(4));
    }
}
