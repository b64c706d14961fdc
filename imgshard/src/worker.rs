//! Per-thread conversion work
//!
//! One `ConversionWorker` owns one contiguous range of the input list and
//! the shard files that range maps onto. Failures while reading or
//! decoding a single image skip that image and continue; failures writing
//! shard files abort the worker and surface through the driver.

use std::fs;
use std::path::Path;

use imgshard_record::ImageRecord;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::ConvertConfig;
use crate::discover::DiscoveredFiles;
use crate::error::Result;
use crate::partition::IndexRange;
use crate::shard::{global_shard_index, shard_boundaries, ShardSummary, ShardWriter};
use crate::transcode::{ImageTranscoder, TranscodeError};

/// Cadence of per-worker progress lines, in successfully processed items
const PROGRESS_INTERVAL: usize = 1000;

/// Errors scoped to a single input; the worker logs and skips
#[derive(Debug, Error)]
pub enum ItemError {
    /// Input bytes could not be read
    #[error("Read failed: {0}")]
    Read(#[from] std::io::Error),

    /// Input could not be normalized or probed
    #[error(transparent)]
    Transcode(#[from] TranscodeError),
}

/// Work handed to one conversion worker
#[derive(Debug, Clone)]
pub struct WorkAssignment {
    /// Index of the worker thread, 0-based
    pub thread_index: usize,
    /// Input-list range this worker converts
    pub range: IndexRange,
    /// Shards this worker cuts its range into
    pub shards_per_thread: usize,
}

/// Per-worker conversion outcome
#[derive(Debug, Clone)]
pub struct WorkerSummary {
    pub thread_index: usize,
    /// Records successfully written across all of this worker's shards
    pub processed: usize,
    /// Inputs skipped across all of this worker's shards
    pub skipped: usize,
    pub shards: Vec<ShardSummary>,
}

/// One thread's unit of conversion work
///
/// Owns its transcoder and shard writers exclusively; shares the input
/// sequences read-only with every other worker.
pub struct ConversionWorker<'a> {
    config: &'a ConvertConfig,
    split: &'a str,
    files: &'a DiscoveredFiles,
    assignment: WorkAssignment,
    transcoder: ImageTranscoder,
}

impl<'a> ConversionWorker<'a> {
    pub fn new(
        config: &'a ConvertConfig,
        split: &'a str,
        files: &'a DiscoveredFiles,
        assignment: WorkAssignment,
    ) -> Self {
        ConversionWorker {
            config,
            split,
            files,
            assignment,
            transcoder: ImageTranscoder::new(),
        }
    }

    /// Converts the assigned range, writing one shard file per sub-range.
    ///
    /// Every shard file is created even when its sub-range is empty, so
    /// the output directory always holds the full shard sequence.
    pub fn run(self) -> Result<WorkerSummary> {
        let thread_index = self.assignment.thread_index;
        let range = self.assignment.range;
        let boundaries = shard_boundaries(range, self.assignment.shards_per_thread);

        let mut processed = 0usize;
        let mut skipped = 0usize;
        let mut shards = Vec::with_capacity(self.assignment.shards_per_thread);

        for local in 0..self.assignment.shards_per_thread {
            let global =
                global_shard_index(thread_index, self.assignment.shards_per_thread, local);
            let mut writer =
                ShardWriter::create(&self.config.output, self.split, global, self.config.shards)?;

            for index in boundaries[local]..boundaries[local + 1] {
                match self.convert_one(index) {
                    Ok(record) => {
                        writer.append(&record)?;
                        processed += 1;
                        if processed % PROGRESS_INTERVAL == 0 {
                            info!(
                                thread = thread_index,
                                "Processed {} of {} images in thread range",
                                processed,
                                range.len()
                            );
                        }
                    }
                    Err(e) => {
                        warn!(
                            thread = thread_index,
                            file = %self.files.filenames[index].display(),
                            "Skipping image: {}",
                            e
                        );
                        writer.record_skip();
                        skipped += 1;
                    }
                }
            }

            let summary = writer.finish()?;
            info!(
                thread = thread_index,
                "Wrote {} images to {}",
                summary.written,
                summary.path.display()
            );
            shards.push(summary);
        }

        info!(
            thread = thread_index,
            "Wrote {} images to {} shards",
            processed,
            shards.len()
        );

        Ok(WorkerSummary {
            thread_index,
            processed,
            skipped,
            shards,
        })
    }

    /// Runs the per-image pipeline for one input index.
    fn convert_one(&self, index: usize) -> std::result::Result<ImageRecord, ItemError> {
        let path = &self.files.filenames[index];
        let raw = fs::read(path)?;
        let canonical = self.transcoder.normalize(path, raw)?;
        let dims = self.transcoder.dimensions(&canonical)?;
        Ok(ImageRecord::new(
            file_basename(path),
            canonical,
            dims.height,
            dims.width,
            self.files.labels[index],
            self.files.texts[index].clone(),
        ))
    }
}

/// Base name of `path` as a UTF-8 string, lossy for odd encodings.
fn file_basename(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
