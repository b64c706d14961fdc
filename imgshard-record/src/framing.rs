//! Length-delimited frame codec
//!
//! A shard file is a plain sequence of frames, each independently
//! parseable:
//!
//! ```text
//! [ payload length : u64 LE ]
//! [ masked CRC32 of the length bytes : u32 LE ]
//! [ payload ]
//! [ masked CRC32 of the payload : u32 LE ]
//! ```
//!
//! Checksums are IEEE CRC32 (`crc32fast`), masked with a rotate-and-add so
//! a checksum value stored inside a payload never doubles as a valid frame
//! checksum. The length checksum is verified before the payload buffer is
//! allocated, so a corrupt length cannot trigger an oversized allocation.

use std::fs::File;
use std::io::{BufReader, ErrorKind, Read, Write};
use std::path::Path;

use crate::error::{RecordError, Result};
use crate::record::ImageRecord;

/// Largest payload a frame may declare (1 GiB)
pub const MAX_FRAME_LEN: u64 = 1 << 30;

const LEN_BYTES: usize = 8;
const CRC_BYTES: usize = 4;
const CRC_MASK_DELTA: u32 = 0xa282_ead8;

/// CRC32 masked so checksums of checksums stay distinct
fn masked_crc32(bytes: &[u8]) -> u32 {
    crc32fast::hash(bytes)
        .rotate_right(15)
        .wrapping_add(CRC_MASK_DELTA)
}

/// Reads until `buf` is full or the source ends, returning bytes read.
fn fill<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(RecordError::Io(e)),
        }
    }
    Ok(filled)
}

/// Streams frames onto any `Write` sink
pub struct FrameWriter<W: Write> {
    inner: W,
}

impl<W: Write> FrameWriter<W> {
    pub fn new(inner: W) -> Self {
        FrameWriter { inner }
    }

    /// Appends one frame holding `payload`.
    pub fn write_frame(&mut self, payload: &[u8]) -> Result<()> {
        let length = payload.len() as u64;
        if length > MAX_FRAME_LEN {
            return Err(RecordError::FrameTooLarge {
                length,
                max: MAX_FRAME_LEN,
            });
        }
        let len_bytes = length.to_le_bytes();
        self.inner.write_all(&len_bytes)?;
        self.inner.write_all(&masked_crc32(&len_bytes).to_le_bytes())?;
        self.inner.write_all(payload)?;
        self.inner.write_all(&masked_crc32(payload).to_le_bytes())?;
        Ok(())
    }

    /// Flushes the underlying sink.
    pub fn flush(&mut self) -> Result<()> {
        Ok(self.inner.flush()?)
    }

    /// Unwraps the underlying sink.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

/// Reads frames back from any `Read` source
pub struct FrameReader<R: Read> {
    inner: R,
}

impl<R: Read> FrameReader<R> {
    pub fn new(inner: R) -> Self {
        FrameReader { inner }
    }

    /// Reads the next frame payload, or `None` at a clean end of stream.
    ///
    /// A stream that ends anywhere inside a frame is reported as
    /// [`RecordError::Truncated`]; ending exactly between frames is the
    /// normal termination.
    pub fn read_frame(&mut self) -> Result<Option<Vec<u8>>> {
        let mut len_bytes = [0u8; LEN_BYTES];
        let got = fill(&mut self.inner, &mut len_bytes)?;
        if got == 0 {
            return Ok(None);
        }
        if got < LEN_BYTES {
            return Err(RecordError::Truncated {
                expected: (LEN_BYTES + CRC_BYTES) as u64,
                actual: got as u64,
            });
        }

        let mut len_crc = [0u8; CRC_BYTES];
        let got = fill(&mut self.inner, &mut len_crc)?;
        if got < CRC_BYTES {
            return Err(RecordError::Truncated {
                expected: (LEN_BYTES + CRC_BYTES) as u64,
                actual: (LEN_BYTES + got) as u64,
            });
        }
        let stored = u32::from_le_bytes(len_crc);
        let computed = masked_crc32(&len_bytes);
        if stored != computed {
            return Err(RecordError::ChecksumMismatch { stored, computed });
        }

        let length = u64::from_le_bytes(len_bytes);
        if length > MAX_FRAME_LEN {
            return Err(RecordError::FrameTooLarge {
                length,
                max: MAX_FRAME_LEN,
            });
        }

        let mut payload = vec![0u8; length as usize];
        let got = fill(&mut self.inner, &mut payload)?;
        if (got as u64) < length {
            return Err(RecordError::Truncated {
                expected: length + CRC_BYTES as u64,
                actual: got as u64,
            });
        }

        let mut payload_crc = [0u8; CRC_BYTES];
        let got = fill(&mut self.inner, &mut payload_crc)?;
        if got < CRC_BYTES {
            return Err(RecordError::Truncated {
                expected: length + CRC_BYTES as u64,
                actual: length + got as u64,
            });
        }
        let stored = u32::from_le_bytes(payload_crc);
        let computed = masked_crc32(&payload);
        if stored != computed {
            return Err(RecordError::ChecksumMismatch { stored, computed });
        }

        Ok(Some(payload))
    }
}

/// Opens `path` and decodes every image record in it.
pub fn read_image_records(path: &Path) -> Result<Vec<ImageRecord>> {
    let file = File::open(path)?;
    let mut reader = FrameReader::new(BufReader::new(file));
    let mut records = Vec::new();
    while let Some(payload) = reader.read_frame()? {
        records.push(ImageRecord::from_bytes(&payload)?);
    }
    Ok(records)
}
