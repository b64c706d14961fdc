//! imgshard library interface
//!
//! Exposes the conversion pipeline for integration tests and for
//! embedding the converter in other tools.

pub mod config;
pub mod discover;
pub mod error;
pub mod partition;
pub mod pipeline;
pub mod shard;
pub mod transcode;
pub mod worker;

pub use config::{Args, ConvertConfig};
pub use error::{ConvertError, Result};
pub use pipeline::{convert_directory, Pipeline, RunReport};
