//! Serialized image record payload
//!
//! One `ImageRecord` describes one converted image: the canonical encoded
//! bytes plus the metadata a training pipeline needs to consume it without
//! re-probing the image itself.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Channel count every record carries after normalization
pub const CHANNELS: u8 = 3;

/// Color space of the canonical encoding
pub const COLORSPACE: &str = "RGB";

/// Container format of the canonical encoding
pub const FORMAT: &str = "JPEG";

/// One converted image plus its metadata
///
/// Immutable once constructed. `channels`, `colorspace` and `format` are
/// fixed by the conversion pipeline; they are stored per record so shard
/// files stay self-describing for downstream readers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Base name of the source file
    pub filename: String,
    /// Canonical encoded image bytes
    pub encoded: Vec<u8>,
    /// Image height in pixels
    pub height: u32,
    /// Image width in pixels
    pub width: u32,
    /// Channel count, always [`CHANNELS`]
    pub channels: u8,
    /// Color space label, always [`COLORSPACE`]
    pub colorspace: String,
    /// Encoding format label, always [`FORMAT`]
    pub format: String,
    /// Integer class label, non-negative
    pub label: i64,
    /// Human-readable class label
    pub text: String,
}

impl ImageRecord {
    /// Builds a record around canonical encoded bytes, filling the fixed
    /// `channels`/`colorspace`/`format` fields.
    pub fn new(
        filename: impl Into<String>,
        encoded: Vec<u8>,
        height: u32,
        width: u32,
        label: i64,
        text: impl Into<String>,
    ) -> Self {
        ImageRecord {
            filename: filename.into(),
            encoded,
            height,
            width,
            channels: CHANNELS,
            colorspace: COLORSPACE.to_string(),
            format: FORMAT.to_string(),
            label,
            text: text.into(),
        }
    }

    /// Serializes the record into a frame payload.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Deserializes a record from a frame payload.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}
