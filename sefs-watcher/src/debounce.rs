use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::pending::{ChangeKind, PendingBatch};
use crate::sink::IngestionSink;

/// A raw per-path notification handed off from the (non-async) OS notifier
/// thread to this async debounce loop.
#[derive(Debug, Clone)]
pub struct RawChange {
    pub path: PathBuf,
    pub kind: ChangeKind,
}

/// Steps 3-4 of §4.7: accumulate raw changes into a pending map keyed by
/// path (last action wins), debounced by `debounce`; when the timer fires,
/// snapshot-and-clear the map and dispatch each entry to `sink` in arrival
/// order. Runs until `rx` closes (the watcher was dropped).
pub async fn run(
    mut rx: mpsc::Receiver<RawChange>,
    sink: Arc<dyn IngestionSink>,
    debounce: Duration,
) {
    let mut pending = PendingBatch::default();
    let mut deadline: Option<Instant> = None;

    loop {
        let wait = match deadline {
            Some(d) => d.saturating_duration_since(Instant::now()),
            None => Duration::from_secs(3600),
        };

        tokio::select! {
            maybe = rx.recv() => {
                match maybe {
                    Some(raw) => {
                        pending.upsert(raw.path, raw.kind);
                        deadline = Some(Instant::now() + debounce);
                    }
                    None => {
                        if !pending.is_empty() {
                            flush(&mut pending, sink.as_ref()).await;
                        }
                        return;
                    }
                }
            }
            _ = tokio::time::sleep(wait) => {
                if deadline.is_some() && Instant::now() >= deadline.unwrap() {
                    deadline = None;
                    flush(&mut pending, sink.as_ref()).await;
                }
            }
        }
    }
}

async fn flush(pending: &mut PendingBatch, sink: &dyn IngestionSink) {
    let drained = pending.drain();
    for (path, kind) in drained {
        match kind {
            ChangeKind::Changed => sink.on_change(path).await,
            ChangeKind::Deleted => sink.on_delete(path).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use async_trait::async_trait;

    #[derive(Default)]
    struct RecordingSink {
        changed: Mutex<Vec<PathBuf>>,
        deleted: Mutex<Vec<PathBuf>>,
    }

    #[async_trait]
    impl IngestionSink for RecordingSink {
        async fn on_change(&self, path: PathBuf) {
            self.changed.lock().unwrap().push(path);
        }
        async fn on_delete(&self, path: PathBuf) {
            self.deleted.lock().unwrap().push(path);
        }
    }

    #[tokio::test]
    async fn debounces_repeated_changes_to_the_same_path() {
        let (tx, rx) = mpsc::channel(16);
        let sink = Arc::new(RecordingSink::default());
        let handle = tokio::spawn(run(rx, sink.clone(), Duration::from_millis(20)));

        for _ in 0..5 {
            tx.send(RawChange {
                path: PathBuf::from("a.txt"),
                kind: ChangeKind::Changed,
            })
            .await
            .unwrap();
        }
        drop(tx);
        handle.await.unwrap();

        assert_eq!(sink.changed.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn last_action_wins_when_both_change_and_delete_arrive() {
        let (tx, rx) = mpsc::channel(16);
        let sink = Arc::new(RecordingSink::default());
        let handle = tokio::spawn(run(rx, sink.clone(), Duration::from_millis(20)));

        tx.send(RawChange {
            path: PathBuf::from("a.txt"),
            kind: ChangeKind::Changed,
        })
        .await
        .unwrap();
        tx.send(RawChange {
            path: PathBuf::from("a.txt"),
            kind: ChangeKind::Deleted,
        })
        .await
        .unwrap();
        drop(tx);
        handle.await.unwrap();

        assert!(sink.changed.lock().unwrap().is_empty());
        assert_eq!(sink.deleted.lock().unwrap().len(), 1);
    }
}
