//! Ambient observability stack (§4.13): structured tracing setup, bounded
//! pipeline stage metrics, embedding-provider health aggregation, and
//! degradation-event tracking with simple alert thresholds.

pub mod degradation;
pub mod health;
pub mod metrics;
pub mod tracing_setup;

pub use degradation::{AlertLevel, DegradationAlert, DegradationTracker};
pub use health::{aggregate_health, HealthSummary};
pub use metrics::{MetricsCollector, MetricsSummary, StageKind};
pub use tracing_setup::init_tracing;
