mod ring_buffer;
mod stage_metrics;

pub use stage_metrics::{MetricsCollector, MetricsSummary, StageKind};
