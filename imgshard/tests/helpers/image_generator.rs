//! Test image generation utilities
//!
//! Creates small synthetic images for integration testing, so tests never
//! depend on binary fixtures checked into the repository.

use std::path::{Path, PathBuf};

use anyhow::Result;
use image::{GrayImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};

/// Configuration for generated test images
#[derive(Debug, Clone)]
pub struct ImageConfig {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Default for ImageConfig {
    fn default() -> Self {
        ImageConfig {
            width: 16,
            height: 12,
        }
    }
}

fn rgb_pattern(config: &ImageConfig) -> RgbImage {
    let mut img = RgbImage::new(config.width, config.height);
    for y in 0..config.height {
        for x in 0..config.width {
            img.put_pixel(x, y, Rgb([(x * 16) as u8, (y * 16) as u8, ((x + y) * 8) as u8]));
        }
    }
    img
}

/// Generates an RGB JPEG with a deterministic gradient pattern.
pub fn generate_jpeg(path: &Path, config: &ImageConfig) -> Result<()> {
    rgb_pattern(config).save_with_format(path, ImageFormat::Jpeg)?;
    Ok(())
}

/// Generates an RGB PNG with a deterministic gradient pattern.
pub fn generate_png(path: &Path, config: &ImageConfig) -> Result<()> {
    rgb_pattern(config).save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// Generates an RGBA PNG; the alpha channel exercises the conversion path.
pub fn generate_rgba_png(path: &Path, config: &ImageConfig) -> Result<()> {
    let mut img = RgbaImage::new(config.width, config.height);
    for y in 0..config.height {
        for x in 0..config.width {
            img.put_pixel(x, y, Rgba([(x * 10) as u8, (y * 10) as u8, 120, 180]));
        }
    }
    img.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// Generates a grayscale JPEG, which violates the 3-channel invariant.
pub fn generate_gray_jpeg(path: &Path, config: &ImageConfig) -> Result<()> {
    let img = GrayImage::new(config.width, config.height);
    img.save_with_format(path, ImageFormat::Jpeg)?;
    Ok(())
}

/// Writes bytes no image codec accepts.
pub fn generate_corrupt_file(path: &Path) -> Result<()> {
    std::fs::write(path, b"this is not an image at all")?;
    Ok(())
}

/// Populates `dir` with `count` JPEG files named `img_000.jpg` onward,
/// returning the paths in name order.
pub fn generate_library(dir: &Path, count: usize) -> Result<Vec<PathBuf>> {
    let config = ImageConfig::default();
    let mut paths = Vec::with_capacity(count);
    for i in 0..count {
        let path = dir.join(format!("img_{:03}.jpg", i));
        generate_jpeg(&path, &config)?;
        paths.push(path);
    }
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_generated_jpeg_decodes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fixture.jpg");
        generate_jpeg(&path, &ImageConfig::default()).unwrap();

        let decoded = image::open(&path).unwrap();
        assert_eq!(decoded.width(), 16);
        assert_eq!(decoded.height(), 12);
    }

    #[test]
    fn test_generated_library_is_ordered() {
        let dir = TempDir::new().unwrap();
        let paths = generate_library(dir.path(), 4).unwrap();
        assert_eq!(paths.len(), 4);
        assert!(paths[0].ends_with("img_000.jpg"));
        assert!(paths[3].ends_with("img_003.jpg"));
        for path in paths {
            assert!(path.exists());
        }
    }
}
