use std::path::PathBuf;

/// What happened to a path since the last flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Changed,
    Deleted,
}

/// Pending changes since the last flush, last-action-wins per path,
/// ordered by first appearance in the current batch.
#[derive(Debug, Default)]
pub struct PendingBatch {
    entries: Vec<(PathBuf, ChangeKind)>,
}

impl PendingBatch {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record `kind` for `path`, overwriting any prior kind for the same
    /// path but keeping its original position in the batch.
    pub fn upsert(&mut self, path: PathBuf, kind: ChangeKind) {
        if let Some(existing) = self.entries.iter_mut().find(|(p, _)| *p == path) {
            existing.1 = kind;
        } else {
            self.entries.push((path, kind));
        }
    }

    /// Snapshot and clear the batch, returning entries in arrival order.
    pub fn drain(&mut self) -> Vec<(PathBuf, ChangeKind)> {
        std::mem::take(&mut self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_path_keeps_position_but_updates_kind() {
        let mut batch = PendingBatch::default();
        batch.upsert(PathBuf::from("a"), ChangeKind::Changed);
        batch.upsert(PathBuf::from("b"), ChangeKind::Changed);
        batch.upsert(PathBuf::from("a"), ChangeKind::Deleted);

        let drained = batch.drain();
        assert_eq!(drained[0], (PathBuf::from("a"), ChangeKind::Deleted));
        assert_eq!(drained[1], (PathBuf::from("b"), ChangeKind::Changed));
    }

    #[test]
    fn drain_clears_the_batch() {
        let mut batch = PendingBatch::default();
        batch.upsert(PathBuf::from("a"), ChangeKind::Changed);
        batch.drain();
        assert!(batch.is_empty());
    }
}
