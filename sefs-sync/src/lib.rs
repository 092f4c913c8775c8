//! On-disk layout reconciliation: moves files into cluster-named folders
//! under the sync lock, shielding the watcher from self-caused events.

mod engine;
mod lock;
mod mover;
mod plan;
mod recently_synced;

pub use engine::SyncEngine;
pub use lock::SyncLock;
pub use mover::move_atomic;
pub use plan::{resolve_source, unique_target, SyncMoveResult, SyncPlanEntry};
pub use recently_synced::RecentlySyncedSet;
