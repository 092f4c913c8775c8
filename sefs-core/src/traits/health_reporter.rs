use crate::models::HealthReport;

/// System health reporting for the active embedding/LLM provider.
pub trait HealthReporter: Send + Sync {
    fn report(&self) -> HealthReport;
}
