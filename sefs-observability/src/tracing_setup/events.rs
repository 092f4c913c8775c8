//! Span constructors for the four pipeline stages plus the watcher/scheduler
//! decision points named in §4.13. Kept as thin wrappers around
//! `tracing::info_span!`/`debug_span!` rather than ad-hoc `tracing::info!`
//! call sites so every crate in the workspace opens spans with the same
//! field names (`stage`, `file_id`, `path`).

use tracing::Span;

/// One extraction attempt for a single file. `debug`-level: per-file detail.
pub fn extraction_span(path: &str) -> Span {
    tracing::debug_span!("extraction", stage = "extraction", path)
}

/// One embedding (or summary) provider call for a single file.
pub fn embedding_span(file_id: i64) -> Span {
    tracing::debug_span!("embedding", stage = "embedding", file_id)
}

/// A full clustering run over the current embedding matrix. `info`-level:
/// a stage boundary, not per-file detail.
pub fn clustering_span(file_count: usize) -> Span {
    tracing::info_span!("clustering", stage = "clustering", file_count)
}

/// A sync-engine reconciliation pass.
pub fn sync_span(planned_moves: usize) -> Span {
    tracing::info_span!("sync", stage = "sync", planned_moves)
}

/// The watcher's debounce timer firing and flushing its pending map.
pub fn watcher_flush_span(pending_count: usize) -> Span {
    tracing::debug_span!("watcher_flush", pending_count)
}

/// The recluster scheduler's debounce/cooldown decision for one `request()`.
pub fn scheduler_decision_span(skipped_for_cooldown: bool) -> Span {
    tracing::debug_span!("scheduler_decision", skipped_for_cooldown)
}
