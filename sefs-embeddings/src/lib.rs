//! Provider-selectable embedding + summary generation.
//!
//! Exactly one of [`providers::LocalProvider`] / [`providers::RemoteProvider`]
//! is active at a time, selected by `EmbeddingConfig::provider`. The
//! `EmbeddingEngine` wraps whichever is active behind the shared
//! `sefs_core::traits::EmbeddingProvider` trait, adds text truncation,
//! summary fallback, and per-provider health tracking that's common to both.

mod engine;
pub mod providers;
mod truncate;

pub use engine::EmbeddingEngine;
