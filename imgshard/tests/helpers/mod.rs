//! Test Helper Utilities
//!
//! Shared utilities for testing imgshard

pub mod image_generator;

// Re-export commonly used items
pub use image_generator::{
    generate_corrupt_file, generate_gray_jpeg, generate_jpeg, generate_library, generate_png,
    generate_rgba_png, ImageConfig,
};
