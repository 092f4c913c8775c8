//! Text, hash, and metadata extraction for files SEFS ingests.

mod dispatch;
mod extractor;
mod formats;
mod hash;

pub use extractor::FileExtractor;
