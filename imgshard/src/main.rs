//! imgshard - converts a directory of images into sharded record files
//!
//! Discovers the files under an input directory, normalizes each image to
//! 3-channel JPEG, and writes the images with their labels into a fixed
//! number of length-delimited record shards, in parallel across worker
//! threads.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use imgshard::config::{Args, ConvertConfig};
use imgshard::pipeline::convert_directory;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Build identification immediately after tracing init
    info!(
        "Starting imgshard v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let config = ConvertConfig::from_args(Args::parse())?;

    std::fs::create_dir_all(&config.output).with_context(|| {
        format!(
            "Failed to create output directory {}",
            config.output.display()
        )
    })?;
    info!("Saving results to {}", config.output.display());

    convert_directory(config, "lab")?;

    Ok(())
}
