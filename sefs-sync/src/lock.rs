use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

/// Process-wide sync lock (§4.6). While held, the watcher must drop
/// filesystem events rather than feed them back into ingestion — an
/// atomic flag backed by a `Notify` so waiters are woken rather than
/// busy-polling, following the same cancellation-flag shape used
/// elsewhere in this codebase.
pub struct SyncLock {
    locked: AtomicBool,
    notify: Notify,
}

impl SyncLock {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            locked: AtomicBool::new(false),
            notify: Notify::new(),
        })
    }

    /// Whether the lock is currently held. Never blocks.
    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Acquire)
    }

    /// Wait until the lock is free, then take it.
    pub async fn acquire(&self) {
        loop {
            if self
                .locked
                .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                return;
            }
            self.notify.notified().await;
        }
    }

    /// Release the lock and wake any waiters.
    pub fn release(&self) {
        self.locked.store(false, Ordering::Release);
        self.notify.notify_waiters();
    }
}

impl Default for SyncLock {
    fn default() -> Self {
        Self {
            locked: AtomicBool::new(false),
            notify: Notify::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn acquire_then_release_unblocks_waiter() {
        let lock = SyncLock::new();
        lock.acquire().await;
        assert!(lock.is_locked());

        let waiter_lock = lock.clone();
        let waiter = tokio::spawn(async move {
            waiter_lock.acquire().await;
        });

        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        lock.release();
        waiter.await.unwrap();
        assert!(lock.is_locked());
    }
}
