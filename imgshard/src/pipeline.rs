//! Conversion run orchestration
//!
//! The driver cuts the input list into one range per worker thread, runs
//! the workers on scoped native threads, joins them all, and aggregates
//! their summaries. Static partitioning only; no queues, no work stealing,
//! no cancellation.

use std::thread;

use tracing::info;

use crate::config::ConvertConfig;
use crate::discover::{discover, DiscoveredFiles};
use crate::error::{ConvertError, Result};
use crate::partition::partition;
use crate::worker::{ConversionWorker, WorkAssignment, WorkerSummary};

/// Aggregate outcome of one conversion run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Inputs handed to the run
    pub files: usize,
    /// Records written across all shards
    pub written: usize,
    /// Inputs skipped across all shards
    pub skipped: usize,
    /// Per-worker summaries, ordered by thread index
    pub workers: Vec<WorkerSummary>,
}

impl RunReport {
    /// Total shard files produced.
    pub fn shard_files(&self) -> usize {
        self.workers.iter().map(|w| w.shards.len()).sum()
    }
}

/// Drives a full conversion run: partition, spawn, join, aggregate
pub struct Pipeline {
    config: ConvertConfig,
}

impl Pipeline {
    pub fn new(config: ConvertConfig) -> Self {
        Pipeline { config }
    }

    /// Converts every discovered file into sharded record files.
    ///
    /// Per-image skips never fail the run; the first worker-fatal error is
    /// propagated after all workers have been joined, so completed shard
    /// files from other workers stay on disk.
    pub fn run(&self, split: &str, files: &DiscoveredFiles) -> Result<RunReport> {
        if files.labels.len() != files.filenames.len()
            || files.texts.len() != files.filenames.len()
        {
            return Err(ConvertError::Config(format!(
                "Parallel input sequences differ in length: {} filenames, {} labels, {} texts",
                files.filenames.len(),
                files.labels.len(),
                files.texts.len()
            )));
        }
        if self.config.threads == 0 || self.config.shards == 0 {
            return Err(ConvertError::Config(format!(
                "threads ({}) and shards ({}) must both be at least 1",
                self.config.threads, self.config.shards
            )));
        }
        if self.config.shards % self.config.threads != 0 {
            return Err(ConvertError::Config(format!(
                "shards ({}) must be evenly divisible by threads ({})",
                self.config.shards, self.config.threads
            )));
        }

        let ranges = partition(files.len(), self.config.threads);
        let shards_per_thread = self.config.shards_per_thread();

        info!(
            files = files.len(),
            threads = self.config.threads,
            shards = self.config.shards,
            "Launching {} threads for {} shards",
            self.config.threads,
            self.config.shards
        );

        let summaries = thread::scope(|scope| -> Result<Vec<WorkerSummary>> {
            let mut handles = Vec::with_capacity(ranges.len());
            for (thread_index, range) in ranges.iter().enumerate() {
                let assignment = WorkAssignment {
                    thread_index,
                    range: *range,
                    shards_per_thread,
                };
                let worker = ConversionWorker::new(&self.config, split, files, assignment);
                handles.push(scope.spawn(move || worker.run()));
            }

            let mut summaries = Vec::with_capacity(handles.len());
            let mut first_error = None;
            for handle in handles {
                match handle.join() {
                    Ok(Ok(summary)) => summaries.push(summary),
                    Ok(Err(e)) => {
                        if first_error.is_none() {
                            first_error = Some(e);
                        }
                    }
                    Err(panic) => std::panic::resume_unwind(panic),
                }
            }
            match first_error {
                Some(e) => Err(e),
                None => Ok(summaries),
            }
        })?;

        let written = summaries.iter().map(|s| s.processed).sum();
        let skipped = summaries.iter().map(|s| s.skipped).sum();

        info!(
            written,
            skipped,
            "Finished writing all {} images in data set",
            files.len()
        );

        Ok(RunReport {
            files: files.len(),
            written,
            skipped,
            workers: summaries,
        })
    }
}

/// Discovers the inputs under `config.input` and converts them.
///
/// One-call library entry: discovery, partitioning and the worker run,
/// with discovery failures surfaced as [`ConvertError::Discover`].
pub fn convert_directory(config: ConvertConfig, split: &str) -> Result<RunReport> {
    let files = discover(&config.input)?;
    info!(
        "Found {} files inside {}",
        files.len(),
        config.input.display()
    );
    Pipeline::new(config).run(split, &files)
}
