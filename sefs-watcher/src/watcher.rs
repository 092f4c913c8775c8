use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher as _};
use sefs_core::errors::{SefsError, SefsResult};
use sefs_core::traits::Extractor;
use tokio::sync::mpsc;

use sefs_sync::{RecentlySyncedSet, SyncLock};

use crate::debounce::{self, RawChange};
use crate::filter::is_hidden_or_temp;
use crate::pending::ChangeKind;
use crate::sink::IngestionSink;

/// A running filesystem watcher. Dropping this stops watching and lets
/// the debounce task drain and exit.
pub struct RootWatcher {
    _inner: RecommendedWatcher,
}

impl RootWatcher {
    /// Start watching `root` recursively. Raw notifier events are filtered
    /// on the notifier's own thread (step 1-2 of §4.7) and handed to an
    /// async debounce task (steps 3-4) over a bounded channel, which
    /// dispatches flushed batches to `sink`.
    pub fn spawn(
        root: PathBuf,
        extractor: Arc<dyn Extractor>,
        sync_lock: Arc<SyncLock>,
        recently_synced: Arc<RecentlySyncedSet>,
        sink: Arc<dyn IngestionSink>,
        debounce_delay: Duration,
    ) -> SefsResult<Self> {
        let (tx, rx) = mpsc::channel::<RawChange>(256);

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let event = match res {
                Ok(event) => event,
                Err(e) => {
                    tracing::warn!(error = %e, "filesystem watcher error");
                    return;
                }
            };
            if sync_lock.is_locked() {
                return;
            }
            for raw in classify(&event) {
                if is_hidden_or_temp(&raw.path) || raw.path.is_dir() {
                    continue;
                }
                if raw.kind == ChangeKind::Changed && !extractor.is_supported(&raw.path) {
                    continue;
                }
                if recently_synced.contains(&raw.path) {
                    continue;
                }
                if tx.blocking_send(raw).is_err() {
                    tracing::warn!("watcher debounce channel closed, dropping event");
                }
            }
        })
        .map_err(|e| SefsError::Config(format!("failed to start filesystem watcher: {e}")))?;

        watcher
            .watch(&root, RecursiveMode::Recursive)
            .map_err(|e| SefsError::Config(format!("failed to watch {}: {e}", root.display())))?;

        tokio::spawn(debounce::run(rx, sink, debounce_delay));

        Ok(Self { _inner: watcher })
    }
}

/// A rename/move is modeled as (delete old) + (change new) rather than a
/// single move event, so the pipeline's hash-based relocation logic
/// handles it identically to a separately observed delete+create pair.
fn classify(event: &Event) -> Vec<RawChange> {
    if is_folder_kind(&event.kind) {
        return Vec::new();
    }
    match &event.kind {
        EventKind::Remove(_) => event
            .paths
            .iter()
            .map(|p| RawChange {
                path: p.clone(),
                kind: ChangeKind::Deleted,
            })
            .collect(),
        EventKind::Create(_) | EventKind::Modify(_) => {
            if event.paths.len() == 2 {
                vec![
                    RawChange {
                        path: event.paths[0].clone(),
                        kind: ChangeKind::Deleted,
                    },
                    RawChange {
                        path: event.paths[1].clone(),
                        kind: ChangeKind::Changed,
                    },
                ]
            } else {
                event
                    .paths
                    .iter()
                    .map(|p| RawChange {
                        path: p.clone(),
                        kind: ChangeKind::Changed,
                    })
                    .collect()
            }
        }
        _ => Vec::new(),
    }
}

/// Whether a notify event is explicitly tagged as a directory event —
/// these are always rejected regardless of change kind.
fn is_folder_kind(kind: &EventKind) -> bool {
    use notify::event::{CreateKind, RemoveKind};
    matches!(
        kind,
        EventKind::Create(CreateKind::Folder) | EventKind::Remove(RemoveKind::Folder)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, ModifyKind, RemoveKind, RenameMode};

    fn event(kind: EventKind, paths: Vec<PathBuf>) -> Event {
        Event {
            kind,
            paths,
            attrs: Default::default(),
        }
    }

    #[test]
    fn remove_event_classifies_as_deleted() {
        let e = event(EventKind::Remove(RemoveKind::File), vec![PathBuf::from("a.txt")]);
        let changes = classify(&e);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].kind, ChangeKind::Deleted);
    }

    #[test]
    fn create_event_classifies_as_changed() {
        let e = event(EventKind::Create(CreateKind::File), vec![PathBuf::from("a.txt")]);
        let changes = classify(&e);
        assert_eq!(changes[0].kind, ChangeKind::Changed);
    }

    #[test]
    fn two_path_rename_splits_into_delete_and_change() {
        let e = event(
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)),
            vec![PathBuf::from("old.txt"), PathBuf::from("new.txt")],
        );
        let changes = classify(&e);
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].kind, ChangeKind::Deleted);
        assert_eq!(changes[0].path, PathBuf::from("old.txt"));
        assert_eq!(changes[1].kind, ChangeKind::Changed);
        assert_eq!(changes[1].path, PathBuf::from("new.txt"));
    }
}
