//! Error types for the conversion pipeline

use std::path::PathBuf;

use thiserror::Error;

use crate::discover::DiscoverError;

/// Result type for conversion operations
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Fatal errors that abort a conversion run
///
/// Per-image decode problems never appear here; they are skips, counted
/// per shard and reported in the run summary.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// Invalid or incomplete run configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input directory could not be listed
    #[error("Discovery error: {0}")]
    Discover(#[from] DiscoverError),

    /// Shard file could not be created or written
    #[error("Shard write failed at {path}: {source}")]
    Shard {
        path: PathBuf,
        source: imgshard_record::RecordError,
    },
}
