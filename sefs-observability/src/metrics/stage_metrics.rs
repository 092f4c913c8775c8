use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use super::ring_buffer::RingBuffer;

/// The three durations §4.13 tracks rolling windows for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    Extraction,
    Embedding,
    Clustering,
}

/// Snapshot of the collector's state, consumed directly in tests and by the
/// (out-of-scope) `/api/metrics` endpoint (§6).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub avg_extraction_ms: f64,
    pub avg_embedding_ms: f64,
    pub avg_clustering_ms: f64,
    pub last_clustering_ms: Option<f64>,
    pub extraction_samples: usize,
    pub embedding_samples: usize,
    pub clustering_samples: usize,
    pub total_files_processed: u64,
}

/// Bounded ring buffers of per-stage durations plus a running total of
/// files processed (§4.13). One instance lives for the daemon's lifetime
/// and is shared (behind an `Arc`) across the pipeline, watcher, and
/// scheduler.
pub struct MetricsCollector {
    extraction: Mutex<RingBuffer>,
    embedding: Mutex<RingBuffer>,
    clustering: Mutex<RingBuffer>,
    files_processed: AtomicU64,
}

impl MetricsCollector {
    pub fn new(ring_capacity: usize) -> Self {
        Self {
            extraction: Mutex::new(RingBuffer::new(ring_capacity)),
            embedding: Mutex::new(RingBuffer::new(ring_capacity)),
            clustering: Mutex::new(RingBuffer::new(ring_capacity)),
            files_processed: AtomicU64::new(0),
        }
    }

    /// Record one stage duration in milliseconds.
    pub fn record_stage(&self, stage: StageKind, duration_ms: f64) {
        let buf = match stage {
            StageKind::Extraction => &self.extraction,
            StageKind::Embedding => &self.embedding,
            StageKind::Clustering => &self.clustering,
        };
        buf.lock().expect("metrics ring buffer poisoned").push(duration_ms);
    }

    /// Bump the running total of files processed by one ingestion call.
    pub fn record_file_processed(&self) {
        self.files_processed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn summary(&self) -> MetricsSummary {
        let extraction = self.extraction.lock().expect("metrics ring buffer poisoned");
        let embedding = self.embedding.lock().expect("metrics ring buffer poisoned");
        let clustering = self.clustering.lock().expect("metrics ring buffer poisoned");
        MetricsSummary {
            avg_extraction_ms: extraction.average(),
            avg_embedding_ms: embedding.average(),
            avg_clustering_ms: clustering.average(),
            last_clustering_ms: clustering.last(),
            extraction_samples: extraction.len(),
            embedding_samples: embedding.len(),
            clustering_samples: clustering.len(),
            total_files_processed: self.files_processed.load(Ordering::Relaxed),
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new(sefs_core::config::defaults::DEFAULT_METRICS_RING_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_reflects_recorded_samples_and_file_count() {
        let collector = MetricsCollector::new(100);
        collector.record_stage(StageKind::Extraction, 5.0);
        collector.record_stage(StageKind::Extraction, 15.0);
        collector.record_stage(StageKind::Clustering, 42.0);
        collector.record_file_processed();
        collector.record_file_processed();

        let summary = collector.summary();
        assert_eq!(summary.avg_extraction_ms, 10.0);
        assert_eq!(summary.last_clustering_ms, Some(42.0));
        assert_eq!(summary.extraction_samples, 2);
        assert_eq!(summary.total_files_processed, 2);
    }

    #[test]
    fn ring_capacity_bounds_sample_count() {
        let collector = MetricsCollector::new(3);
        for i in 0..10 {
            collector.record_stage(StageKind::Embedding, i as f64);
        }
        assert_eq!(collector.summary().embedding_samples, 3);
    }
}
