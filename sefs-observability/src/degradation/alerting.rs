//! Alert thresholds: more than 3 degradations for the same component within
//! an hour is a warning; a component still degraded after 24 hours is
//! critical.

use serde::{Deserialize, Serialize};

use super::tracker::DegradationTracker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    None,
    Warning,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DegradationAlert {
    pub level: AlertLevel,
    pub component: String,
    pub message: String,
}

/// Evaluate alerts from the tracker's current state. At most one alert per
/// component — a long-degraded component doesn't also get the frequency
/// warning.
pub fn evaluate_alerts(tracker: &DegradationTracker) -> Vec<DegradationAlert> {
    let mut alerts = Vec::new();
    let mut seen = std::collections::HashSet::new();

    for event in tracker.events() {
        if !seen.insert(event.component.clone()) {
            continue;
        }

        if let Some(duration) = tracker.degraded_duration(&event.component) {
            if duration > chrono::Duration::hours(24) {
                alerts.push(DegradationAlert {
                    level: AlertLevel::Critical,
                    component: event.component.clone(),
                    message: format!("{} has been degraded for over 24 hours", event.component),
                });
                continue;
            }
        }

        let recent_count = tracker.count_recent(&event.component, 3_600);
        if recent_count > 3 {
            alerts.push(DegradationAlert {
                level: AlertLevel::Warning,
                component: event.component.clone(),
                message: format!(
                    "{} has {} degradation events in the last hour",
                    event.component, recent_count
                ),
            });
        }
    }

    alerts
}

#[cfg(test)]
mod tests {
    use super::*;
    use sefs_core::models::DegradationEvent;

    fn event(component: &str) -> DegradationEvent {
        DegradationEvent {
            component: component.to_string(),
            failure: "provider timeout".to_string(),
            fallback_used: "zero vector".to_string(),
            timestamp: chrono::Utc::now(),
        }
    }

    #[test]
    fn frequent_degradations_raise_a_warning() {
        let tracker = DegradationTracker::new();
        for _ in 0..4 {
            tracker.record(event("embedding"));
        }
        let alerts = evaluate_alerts(&tracker);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].level, AlertLevel::Warning);
    }

    #[test]
    fn no_events_means_no_alerts() {
        let tracker = DegradationTracker::new();
        assert!(evaluate_alerts(&tracker).is_empty());
    }

    #[test]
    fn sparse_degradations_below_threshold_raise_nothing() {
        let tracker = DegradationTracker::new();
        tracker.record(event("namer"));
        tracker.record(event("namer"));
        assert!(evaluate_alerts(&tracker).is_empty());
    }
}
