//! Error types for the record container

use thiserror::Error;

/// Result type for record container operations
pub type Result<T> = std::result::Result<T, RecordError>;

/// Errors raised while writing or reading record frames
#[derive(Error, Debug)]
pub enum RecordError {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Record payload serialization or deserialization error
    #[error("Codec error: {0}")]
    Codec(#[from] bincode::Error),

    /// Stream ended inside a frame
    #[error("Truncated frame: expected {expected} bytes, found {actual}")]
    Truncated { expected: u64, actual: u64 },

    /// Stored checksum does not match the recomputed one
    #[error("Checksum mismatch: stored {stored:#010x}, computed {computed:#010x}")]
    ChecksumMismatch { stored: u32, computed: u32 },

    /// Frame header declares a payload beyond the supported maximum
    #[error("Frame length {length} exceeds maximum {max}")]
    FrameTooLarge { length: u64, max: u64 },
}
