//! Event statistics tracking.
//!
//! This module provides thread-safe counters for handled events and swallowed
//! failures.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use super::types::{EventKind, FailureKind};

/// Thread-safe event statistics tracker.
///
/// Tracks handled events and swallowed failures using atomic counters. All
/// categories are initialized to zero on creation, so the service can share
/// it with spawned tasks (the theme probe) through an `Arc`.
pub struct EventStats {
    events: HashMap<EventKind, AtomicUsize>,
    failures: HashMap<FailureKind, AtomicUsize>,
}

impl EventStats {
    pub fn new() -> Self {
        let mut events = HashMap::new();
        for kind in EventKind::iter() {
            events.insert(kind, AtomicUsize::new(0));
        }

        let mut failures = HashMap::new();
        for kind in FailureKind::iter() {
            failures.insert(kind, AtomicUsize::new(0));
        }

        EventStats { events, failures }
    }

    /// Increment an event counter.
    pub fn increment_event(&self, kind: EventKind) {
        if let Some(counter) = self.events.get(&kind) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to increment event counter for {:?} which is not in the map. \
                 This indicates a bug in EventStats initialization.",
                kind
            );
        }
    }

    /// Increment a failure counter.
    pub fn increment_failure(&self, kind: FailureKind) {
        if let Some(counter) = self.failures.get(&kind) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to increment failure counter for {:?} which is not in the map. \
                 This indicates a bug in EventStats initialization.",
                kind
            );
        }
    }

    /// Get the count for an event category.
    pub fn get_event_count(&self, kind: EventKind) -> usize {
        self.events
            .get(&kind)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Get the count for a failure category.
    pub fn get_failure_count(&self, kind: FailureKind) -> usize {
        self.failures
            .get(&kind)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Sum of all event counters.
    pub fn total_events(&self) -> usize {
        self.events.values().map(|c| c.load(Ordering::SeqCst)).sum()
    }

    /// Sum of all failure counters.
    pub fn total_failures(&self) -> usize {
        self.failures.values().map(|c| c.load(Ordering::SeqCst)).sum()
    }
}

impl Default for EventStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Logs non-zero counters at info level.
pub fn log_event_statistics(stats: &EventStats) {
    log::info!(
        "Handled {} events ({} swallowed failures)",
        stats.total_events(),
        stats.total_failures()
    );
    for kind in EventKind::iter() {
        let count = stats.get_event_count(kind);
        if count > 0 {
            log::info!("   {}: {}", kind, count);
        }
    }
    for kind in FailureKind::iter() {
        let count = stats.get_failure_count(kind);
        if count > 0 {
            log::info!("   {}: {}", kind, count);
        }
    }
}
