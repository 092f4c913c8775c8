//! Lightweight health aggregation (§4.13): "is the active embedding
//! provider currently reachable", read off the last observed success/
//! failure per provider rather than a fresh network call on every check.
//! The embedding provider's own `AtomicBool` availability flag
//! (`sefs-embeddings`' `EmbeddingEngine`) is the source of truth; this
//! module only folds one or more `HealthReporter`s into a single summary
//! for the (out-of-scope) status endpoint.

use sefs_core::models::HealthReport;
use sefs_core::traits::HealthReporter;

/// Aggregate snapshot across every `HealthReporter` the daemon holds (in
/// practice, exactly one: the active embedding/LLM provider).
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct HealthSummary {
    pub all_available: bool,
    pub reports: Vec<HealthReport>,
}

/// Fold a set of reporters into one summary. `all_available` is
/// conjunctive: any single unreachable provider marks the whole daemon as
/// not-fully-healthy, matching the way a dimension-migration pass or a
/// search request would actually be affected.
pub fn aggregate_health(reporters: &[&dyn HealthReporter]) -> HealthSummary {
    let reports: Vec<HealthReport> = reporters.iter().map(|r| r.report()).collect();
    let all_available = reports.iter().all(|r| r.available);
    HealthSummary {
        all_available,
        reports,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    struct StubReporter(bool);
    impl HealthReporter for StubReporter {
        fn report(&self) -> HealthReport {
            HealthReport {
                provider: "stub/v1".to_string(),
                available: self.0,
                checked_at: Utc::now(),
            }
        }
    }

    #[test]
    fn all_available_is_true_only_when_every_reporter_is_up() {
        let up = StubReporter(true);
        let down = StubReporter(false);

        let summary = aggregate_health(&[&up]);
        assert!(summary.all_available);

        let summary = aggregate_health(&[&up, &down]);
        assert!(!summary.all_available);
        assert_eq!(summary.reports.len(), 2);
    }

    #[test]
    fn empty_reporter_set_is_vacuously_available() {
        let summary = aggregate_health(&[]);
        assert!(summary.all_available);
        assert!(summary.reports.is_empty());
    }
}
