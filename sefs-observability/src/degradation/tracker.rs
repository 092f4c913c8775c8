use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use sefs_core::models::DegradationEvent;

const MAX_TRACKED_EVENTS: usize = 500;

/// Bounded history of [`DegradationEvent`]s (§4.13, §7): every time a
/// component falls back to a lower-quality path — a zero embedding
/// vector, a keyword-fallback cluster name, a padded/truncated dimension —
/// it is recorded here so [`super::alerting::evaluate_alerts`] can flag a
/// component that degrades repeatedly or for a long stretch.
#[derive(Default)]
pub struct DegradationTracker {
    events: Mutex<VecDeque<DegradationEvent>>,
}

impl DegradationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, event: DegradationEvent) {
        let mut events = self.events.lock().expect("degradation tracker poisoned");
        if events.len() == MAX_TRACKED_EVENTS {
            events.pop_front();
        }
        events.push_back(event);
    }

    /// Snapshot of every tracked event, oldest first.
    pub fn events(&self) -> Vec<DegradationEvent> {
        self.events.lock().expect("degradation tracker poisoned").iter().cloned().collect()
    }

    /// How long `component` has had at least one tracked degradation event
    /// without a gap since the oldest one still in the (bounded) history —
    /// there is no explicit "recovered" event in the model, so this is a
    /// lower bound: "degraded continuously for at least this long,
    /// assuming no recovery happened between tracked events".
    pub fn degraded_duration(&self, component: &str) -> Option<Duration> {
        let events = self.events.lock().expect("degradation tracker poisoned");
        let oldest: Option<DateTime<Utc>> = events
            .iter()
            .filter(|e| e.component == component)
            .map(|e| e.timestamp)
            .min();
        oldest.map(|t| Utc::now() - t)
    }

    /// Count of `component`'s degradation events within the last
    /// `window_secs` seconds.
    pub fn count_recent(&self, component: &str, window_secs: i64) -> usize {
        let cutoff = Utc::now() - Duration::seconds(window_secs);
        self.events
            .lock()
            .expect("degradation tracker poisoned")
            .iter()
            .filter(|e| e.component == component && e.timestamp >= cutoff)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(component: &str) -> DegradationEvent {
        DegradationEvent {
            component: component.to_string(),
            failure: "provider timeout".to_string(),
            fallback_used: "zero vector".to_string(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn counts_only_events_for_the_named_component() {
        let tracker = DegradationTracker::new();
        tracker.record(event("embedding"));
        tracker.record(event("embedding"));
        tracker.record(event("namer"));

        assert_eq!(tracker.count_recent("embedding", 3600), 2);
        assert_eq!(tracker.count_recent("namer", 3600), 1);
        assert_eq!(tracker.count_recent("sync", 3600), 0);
    }

    #[test]
    fn degraded_duration_is_none_without_any_events() {
        let tracker = DegradationTracker::new();
        assert!(tracker.degraded_duration("embedding").is_none());
    }

    #[test]
    fn capacity_evicts_oldest_event() {
        let tracker = DegradationTracker::new();
        for _ in 0..(MAX_TRACKED_EVENTS + 10) {
            tracker.record(event("embedding"));
        }
        assert_eq!(tracker.events().len(), MAX_TRACKED_EVENTS);
    }
}
