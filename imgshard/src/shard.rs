//! Shard boundaries, naming and writing
//!
//! A thread's range is cut into sub-ranges by the same interpolation rule
//! the thread partition uses, and each sub-range streams into one shard
//! file. Shard files are numbered globally so the output directory reads
//! as one flat `<split>-<index>-of-<total>` sequence regardless of which
//! thread wrote which file.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use imgshard_record::{FrameWriter, ImageRecord, RecordError};

use crate::error::{ConvertError, Result};
use crate::partition::IndexRange;

/// Splits `range` into `shard_count + 1` non-decreasing boundaries.
///
/// Boundary 0 is `range.start`, the last is `range.end`. Empty sub-ranges
/// are legal when the range holds fewer items than shards. `shard_count`
/// must be at least 1.
pub fn shard_boundaries(range: IndexRange, shard_count: usize) -> Vec<usize> {
    debug_assert!(shard_count >= 1);
    (0..=shard_count)
        .map(|s| range.start + (range.len() as u128 * s as u128 / shard_count as u128) as usize)
        .collect()
}

/// Global index of a thread's local shard.
///
/// Thread `t` owns the contiguous block
/// `[t * shards_per_thread, (t + 1) * shards_per_thread)`, making
/// (thread, local) -> global a bijection.
pub fn global_shard_index(
    thread_index: usize,
    shards_per_thread: usize,
    local_index: usize,
) -> usize {
    thread_index * shards_per_thread + local_index
}

/// Builds the shard file name `<split>-<index:05>-of-<total:05>`.
pub fn shard_file_name(split: &str, global_index: usize, total_shards: usize) -> String {
    format!("{}-{:05}-of-{:05}", split, global_index, total_shards)
}

/// Written/skipped accounting for one finished shard
#[derive(Debug, Clone)]
pub struct ShardSummary {
    /// Path of the shard file
    pub path: PathBuf,
    /// Records written into the file
    pub written: usize,
    /// Inputs skipped while filling this shard
    pub skipped: usize,
}

/// Streams converted records into one shard file
pub struct ShardWriter {
    path: PathBuf,
    writer: FrameWriter<BufWriter<File>>,
    written: usize,
    skipped: usize,
}

impl ShardWriter {
    /// Creates the shard file eagerly, so an empty sub-range still leaves
    /// a valid empty file on disk.
    pub fn create(
        output_dir: &Path,
        split: &str,
        global_index: usize,
        total_shards: usize,
    ) -> Result<Self> {
        let path = output_dir.join(shard_file_name(split, global_index, total_shards));
        let file = File::create(&path).map_err(|e| ConvertError::Shard {
            path: path.clone(),
            source: RecordError::Io(e),
        })?;
        Ok(ShardWriter {
            writer: FrameWriter::new(BufWriter::new(file)),
            path,
            written: 0,
            skipped: 0,
        })
    }

    /// Appends one record to the shard.
    pub fn append(&mut self, record: &ImageRecord) -> Result<()> {
        let payload = record
            .to_bytes()
            .map_err(|e| self.shard_error(e))?;
        self.writer
            .write_frame(&payload)
            .map_err(|e| self.shard_error(e))?;
        self.written += 1;
        Ok(())
    }

    /// Counts one skipped input against this shard.
    pub fn record_skip(&mut self) {
        self.skipped += 1;
    }

    /// Flushes the file and returns the shard summary.
    pub fn finish(mut self) -> Result<ShardSummary> {
        self.writer.flush().map_err(|e| ConvertError::Shard {
            path: self.path.clone(),
            source: e,
        })?;
        Ok(ShardSummary {
            path: self.path,
            written: self.written,
            skipped: self.skipped,
        })
    }

    fn shard_error(&self, source: RecordError) -> ConvertError {
        ConvertError::Shard {
            path: self.path.clone(),
            source,
        }
    }
}
