//! # imgshard record container
//!
//! The on-disk format shared by the imgshard converter and downstream
//! readers: a shard file is a sequence of length-delimited, checksummed
//! frames, each frame carrying one serialized [`ImageRecord`]. Frames are
//! independently parseable, so a reader can stream a shard without an
//! index and detect corruption or truncation per record.

pub mod error;
pub mod framing;
pub mod record;

pub use error::{RecordError, Result};
pub use framing::{read_image_records, FrameReader, FrameWriter};
pub use record::ImageRecord;
