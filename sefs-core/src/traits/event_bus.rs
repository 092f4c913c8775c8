use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

/// Fan-out of progress events to zero or more subscribers. Delivery is
/// best-effort; a subscriber that can no longer receive is dropped silently
/// on the next broadcast, never propagated as an error to the caller.
#[async_trait]
pub trait EventBus: Send + Sync {
    async fn broadcast(&self, payload: Value);
}

#[async_trait]
impl<T: EventBus> EventBus for Arc<T> {
    async fn broadcast(&self, payload: Value) {
        (**self).broadcast(payload).await
    }
}

/// An `EventBus` with no subscribers. Useful for tests and for any pipeline
/// invocation (e.g. `full_scan` from the CLI) that doesn't need live updates.
pub struct NullEventBus;

#[async_trait]
impl EventBus for NullEventBus {
    async fn broadcast(&self, _payload: Value) {}
}
