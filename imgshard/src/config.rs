//! Run configuration
//!
//! Command-line flags are parsed by clap and validated into an immutable
//! `ConvertConfig` that travels by reference through the pipeline. Nothing
//! downstream reads flag state directly.

use std::path::PathBuf;

use clap::Parser;

use crate::error::{ConvertError, Result};

/// Command-line arguments for the converter
#[derive(Debug, Parser)]
#[command(
    name = "imgshard",
    about = "Convert a directory of images into sharded record files",
    version
)]
pub struct Args {
    /// Directory holding the input images
    #[arg(long, env = "IMGSHARD_INPUT")]
    pub input: PathBuf,

    /// Directory receiving the shard files; created if missing
    #[arg(long, env = "IMGSHARD_OUTPUT")]
    pub output: PathBuf,

    /// Total number of shard files across the whole run
    #[arg(long, default_value_t = 10)]
    pub shards: usize,

    /// Number of worker threads; must divide the shard count evenly
    #[arg(long, default_value_t = 2)]
    pub threads: usize,

    /// Class label file; recognized but not consumed by the current
    /// single-label pipeline
    #[arg(long, default_value = "labels")]
    pub labels_file: PathBuf,
}

/// Validated, immutable configuration for one conversion run
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub shards: usize,
    pub threads: usize,
    pub labels_file: PathBuf,
}

impl ConvertConfig {
    /// Validates raw arguments into a run configuration.
    pub fn from_args(args: Args) -> Result<Self> {
        if args.threads == 0 {
            return Err(ConvertError::Config(
                "threads must be at least 1".to_string(),
            ));
        }
        if args.shards == 0 {
            return Err(ConvertError::Config(
                "shards must be at least 1".to_string(),
            ));
        }
        if args.shards % args.threads != 0 {
            return Err(ConvertError::Config(format!(
                "shards ({}) must be evenly divisible by threads ({})",
                args.shards, args.threads
            )));
        }
        Ok(ConvertConfig {
            input: args.input,
            output: args.output,
            shards: args.shards,
            threads: args.threads,
            labels_file: args.labels_file,
        })
    }

    /// Shards each worker thread writes.
    pub fn shards_per_thread(&self) -> usize {
        self.shards / self.threads
    }
}
