use std::sync::Mutex;

use async_trait::async_trait;
use sefs_core::traits::EventBus;
use serde_json::Value;
use tokio::sync::mpsc;

/// Fan-out of bus events to zero or more subscribers (§4.12, §5). The
/// subscriber list is a plain mutex-guarded `Vec` rather than a
/// `tokio::sync::broadcast` channel: a slow or disconnected subscriber must
/// never block or lag the others, and broadcasting iterates a snapshot so a
/// subscriber connecting or dropping mid-broadcast can't deadlock the lock.
#[derive(Default)]
pub struct BroadcastEventBus {
    subscribers: Mutex<Vec<mpsc::UnboundedSender<Value>>>,
}

impl BroadcastEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber and return its receiving half. The
    /// subscriber is dropped from the list the next time a broadcast finds
    /// its sender closed — there is no explicit unsubscribe.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<Value> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers
            .lock()
            .expect("event bus subscriber list poisoned")
            .push(tx);
        rx
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .expect("event bus subscriber list poisoned")
            .len()
    }
}

#[async_trait]
impl EventBus for BroadcastEventBus {
    async fn broadcast(&self, payload: Value) {
        let mut subscribers = self.subscribers.lock().expect("event bus subscriber list poisoned");
        subscribers.retain(|tx| tx.send(payload.clone()).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn broadcast_reaches_every_live_subscriber() {
        let bus = BroadcastEventBus::new();
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();

        bus.broadcast(json!({"type": "file_added"})).await;

        assert_eq!(a.recv().await.unwrap()["type"], "file_added");
        assert_eq!(b.recv().await.unwrap()["type"], "file_added");
    }

    #[tokio::test]
    async fn dropped_subscriber_is_pruned_on_next_broadcast() {
        let bus = BroadcastEventBus::new();
        let rx = bus.subscribe();
        drop(rx);
        assert_eq!(bus.subscriber_count(), 1);

        bus.broadcast(json!({"type": "scan_start"})).await;
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn broadcast_with_no_subscribers_is_a_noop() {
        let bus = BroadcastEventBus::new();
        bus.broadcast(json!({"type": "scan_complete"})).await;
        assert_eq!(bus.subscriber_count(), 0);
    }
}
