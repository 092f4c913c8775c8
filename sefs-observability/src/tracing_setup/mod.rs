//! Global subscriber setup: an env-filter-driven subscriber with a
//! human-readable or structured-JSON formatting layer behind a config flag
//! (§4.13, §8 `log_format`). Pipeline stage spans/events live in
//! [`events`].

pub mod events;

use sefs_core::config::ObservabilityConfig;
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber from the layered observability
/// config. Idempotent-enough for tests: a second call is a harmless no-op
/// if a global subscriber is already set (the error from `try_init` is
/// swallowed rather than panicking the caller).
pub fn init_tracing(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone()));

    let result = if config.log_format.eq_ignore_ascii_case("json") {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .try_init()
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).try_init()
    };

    if let Err(e) = result {
        tracing::debug!(error = %e, "tracing subscriber already initialized");
    }
}
