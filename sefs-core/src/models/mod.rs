mod cluster_record;
mod degradation_event;
mod event;
mod file_record;

pub use cluster_record::ClusterRecord;
pub use degradation_event::{DegradationEvent, HealthReport};
pub use event::{EventRecord, EventType};
pub use file_record::{FileRecord, UNCATEGORISED_CLUSTER_ID};
