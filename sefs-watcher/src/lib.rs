//! Debounced filesystem-event source (§4.7): a native OS notifier on its
//! own thread, filtered and handed off over a bounded channel to an async
//! debounce task that dispatches flushed batches to the pipeline.

mod debounce;
mod filter;
mod pending;
mod sink;
mod watcher;

pub use pending::ChangeKind;
pub use sink::IngestionSink;
pub use watcher::RootWatcher;
