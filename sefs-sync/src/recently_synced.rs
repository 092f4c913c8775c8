use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Shield against re-ingesting paths the sync engine itself just touched.
/// The watcher consults `contains` before treating a filesystem event as
/// user-initiated; entries expire after `ttl` so a genuinely new edit to
/// the same path is eventually picked up again.
pub struct RecentlySyncedSet {
    inner: Mutex<HashMap<PathBuf, Instant>>,
    ttl: Duration,
}

impl RecentlySyncedSet {
    pub fn new(ttl: Duration) -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(HashMap::new()),
            ttl,
        })
    }

    /// Record that `path` was just synced.
    pub fn mark(&self, path: &Path) {
        let mut guard = self.inner.lock().expect("recently-synced set poisoned");
        sweep(&mut guard, self.ttl);
        guard.insert(path.to_path_buf(), Instant::now());
    }

    /// Whether `path` was synced within the TTL window. Sweeps expired
    /// entries as a side effect.
    pub fn contains(&self, path: &Path) -> bool {
        let mut guard = self.inner.lock().expect("recently-synced set poisoned");
        sweep(&mut guard, self.ttl);
        guard.contains_key(path)
    }
}

fn sweep(map: &mut HashMap<PathBuf, Instant>, ttl: Duration) {
    let now = Instant::now();
    map.retain(|_, marked_at| now.duration_since(*marked_at) < ttl);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn marked_path_is_contained_until_ttl_expires() {
        let set = RecentlySyncedSet::new(Duration::from_millis(30));
        let path = PathBuf::from("/root/a/b.txt");
        set.mark(&path);
        assert!(set.contains(&path));

        sleep(Duration::from_millis(50));
        assert!(!set.contains(&path));
    }

    #[test]
    fn unmarked_path_is_not_contained() {
        let set = RecentlySyncedSet::new(Duration::from_secs(5));
        assert!(!set.contains(&PathBuf::from("/root/never/marked.txt")));
    }
}
