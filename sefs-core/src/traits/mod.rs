mod embedding_provider;
mod event_bus;
mod extractor;
mod health_reporter;
mod metadata_store;

pub use embedding_provider::{reconcile_dim, EmbeddingProvider};
pub use event_bus::{EventBus, NullEventBus};
pub use extractor::{Extracted, Extractor};
pub use health_reporter::HealthReporter;
pub use metadata_store::MetadataStore;
