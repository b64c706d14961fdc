//! Image normalization and probing
//!
//! Thin wrapper around the `image` codecs exposing the two operations the
//! pipeline needs: converting PNG inputs to the canonical JPEG encoding
//! and probing canonical bytes for their geometry. Everything that is not
//! PNG passes through byte-for-byte; the probe is what decides whether the
//! bytes are usable.

use std::io::Cursor;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::{GenericImageView, ImageFormat};
use thiserror::Error;

use imgshard_record::record::CHANNELS;

/// Errors scoped to a single image; callers skip the image and continue
#[derive(Debug, Error)]
pub enum TranscodeError {
    /// Codec-level decode or encode failure
    #[error("Image codec error: {0}")]
    Codec(#[from] image::ImageError),

    /// Decoded image does not carry the canonical channel count
    #[error("Expected {expected} channels, found {actual}")]
    ChannelCount { expected: u8, actual: u8 },
}

/// Probed geometry of a canonical image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDims {
    pub height: u32,
    pub width: u32,
    pub channels: u8,
}

/// Stateless wrapper around the image codecs
///
/// One instance per worker thread. Holds only the JPEG re-encode quality;
/// 100 keeps converted PNGs visually identical to their source.
#[derive(Debug, Clone)]
pub struct ImageTranscoder {
    jpeg_quality: u8,
}

impl ImageTranscoder {
    pub fn new() -> Self {
        ImageTranscoder { jpeg_quality: 100 }
    }

    /// True when `path` names a PNG input needing conversion.
    ///
    /// The match is an exact lowercase `png` extension, as in the original
    /// data layout. A mis-cased extension flows down the JPEG probe and is
    /// skipped there if the bytes do not decode.
    pub fn is_png(path: &Path) -> bool {
        path.extension().map(|ext| ext == "png").unwrap_or(false)
    }

    /// Converts PNG bytes to canonical JPEG bytes.
    ///
    /// Non-PNG inputs pass through untouched; valid JPEG inputs keep their
    /// original encoding bit-for-bit. Alpha channels are dropped during
    /// conversion.
    pub fn normalize(&self, path: &Path, raw: Vec<u8>) -> Result<Vec<u8>, TranscodeError> {
        if !Self::is_png(path) {
            return Ok(raw);
        }
        tracing::debug!("Converting PNG to JPEG for {}", path.display());
        let decoded = image::load_from_memory_with_format(&raw, ImageFormat::Png)?;
        let rgb = decoded.to_rgb8();
        let mut jpeg = Cursor::new(Vec::new());
        JpegEncoder::new_with_quality(&mut jpeg, self.jpeg_quality).encode_image(&rgb)?;
        Ok(jpeg.into_inner())
    }

    /// Decodes canonical JPEG bytes and returns their geometry.
    ///
    /// Every image surviving [`normalize`](Self::normalize) must decode as
    /// a 3-channel JPEG; anything else is reported for the caller's skip
    /// path.
    pub fn dimensions(&self, canonical: &[u8]) -> Result<ImageDims, TranscodeError> {
        let decoded = image::load_from_memory_with_format(canonical, ImageFormat::Jpeg)?;
        let channels = decoded.color().channel_count();
        if channels != CHANNELS {
            return Err(TranscodeError::ChannelCount {
                expected: CHANNELS,
                actual: channels,
            });
        }
        let (width, height) = decoded.dimensions();
        Ok(ImageDims {
            height,
            width,
            channels,
        })
    }
}

impl Default for ImageTranscoder {
    fn default() -> Self {
        Self::new()
    }
}
