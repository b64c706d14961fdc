//! End-to-end conversion pipeline tests
//!
//! Each test drives the real pipeline over generated images in temporary
//! directories and reads the shard files back through the record
//! container.

mod helpers;

use std::fs;
use std::path::{Path, PathBuf};

use helpers::{
    generate_corrupt_file, generate_gray_jpeg, generate_jpeg, generate_library, generate_png,
    generate_rgba_png, ImageConfig,
};
use imgshard::config::ConvertConfig;
use imgshard::discover::discover;
use imgshard::error::ConvertError;
use imgshard::pipeline::{convert_directory, Pipeline};
use imgshard_record::{read_image_records, ImageRecord};
use tempfile::TempDir;

fn config_for(input: &Path, output: &Path, shards: usize, threads: usize) -> ConvertConfig {
    ConvertConfig {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        shards,
        threads,
        labels_file: PathBuf::from("labels"),
    }
}

fn run_pipeline(input: &Path, output: &Path, shards: usize, threads: usize) -> imgshard::RunReport {
    let config = config_for(input, output, shards, threads);
    convert_directory(config, "lab").unwrap()
}

fn shard_records(output: &Path, index: usize, total: usize) -> Vec<ImageRecord> {
    let path = output.join(format!("lab-{:05}-of-{:05}", index, total));
    assert!(path.exists(), "missing shard file {}", path.display());
    read_image_records(&path).unwrap()
}

#[test]
fn test_end_to_end_seven_files_seven_shards() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    generate_library(input.path(), 7).unwrap();

    let report = run_pipeline(input.path(), output.path(), 7, 1);

    assert_eq!(report.files, 7);
    assert_eq!(report.written, 7);
    assert_eq!(report.skipped, 0);
    assert_eq!(report.shard_files(), 7);

    for i in 0..7 {
        let records = shard_records(output.path(), i, 7);
        assert_eq!(records.len(), 1, "shard {} should hold one record", i);

        let record = &records[0];
        assert_eq!(record.filename, format!("img_{:03}.jpg", i));
        assert_eq!(record.width, 16);
        assert_eq!(record.height, 12);
        assert_eq!(record.channels, 3);
        assert_eq!(record.colorspace, "RGB");
        assert_eq!(record.format, "JPEG");
        assert_eq!(record.label, 1);
        assert_eq!(record.text, "1");
    }
}

#[test]
fn test_corrupt_input_is_skipped_and_counted() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    generate_library(input.path(), 10).unwrap();
    generate_corrupt_file(&input.path().join("img_0045_broken.jpg")).unwrap();

    let report = run_pipeline(input.path(), output.path(), 2, 2);

    assert_eq!(report.files, 11);
    assert_eq!(report.written, 10);
    assert_eq!(report.skipped, 1);

    let total: usize = (0..2)
        .map(|i| shard_records(output.path(), i, 2).len())
        .sum();
    assert_eq!(total, 10);

    let per_shard_skips: usize = report
        .workers
        .iter()
        .flat_map(|w| w.shards.iter())
        .map(|s| s.skipped)
        .sum();
    assert_eq!(per_shard_skips, 1);
}

#[test]
fn test_multithreaded_run_covers_all_inputs_in_order() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    generate_library(input.path(), 10).unwrap();

    let report = run_pipeline(input.path(), output.path(), 4, 2);

    assert_eq!(report.written, 10);
    assert_eq!(report.shard_files(), 4);

    // Threads get [0,5) and [5,10); each cuts its range into 2 shards
    let mut all_names = Vec::new();
    for i in 0..4 {
        let records = shard_records(output.path(), i, 4);
        for record in &records {
            all_names.push(record.filename.clone());
        }
    }
    let expected: Vec<String> = (0..10).map(|i| format!("img_{:03}.jpg", i)).collect();
    assert_eq!(all_names, expected, "global shard order must follow input order");

    let sizes: Vec<usize> = (0..4)
        .map(|i| shard_records(output.path(), i, 4).len())
        .collect();
    assert_eq!(sizes, vec![2, 3, 2, 3]);
}

#[test]
fn test_empty_input_still_creates_every_shard() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    let report = run_pipeline(input.path(), output.path(), 4, 2);

    assert_eq!(report.files, 0);
    assert_eq!(report.written, 0);
    assert_eq!(report.shard_files(), 4);

    for i in 0..4 {
        assert!(shard_records(output.path(), i, 4).is_empty());
    }
}

#[test]
fn test_png_inputs_are_normalized_to_jpeg() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let config = ImageConfig::default();

    generate_jpeg(&input.path().join("a_photo.jpg"), &config).unwrap();
    generate_png(&input.path().join("b_chart.png"), &config).unwrap();
    generate_rgba_png(&input.path().join("c_logo.png"), &config).unwrap();

    let report = run_pipeline(input.path(), output.path(), 1, 1);
    assert_eq!(report.written, 3);

    let records = shard_records(output.path(), 0, 1);
    assert_eq!(records.len(), 3);
    for record in &records {
        assert_eq!(record.format, "JPEG");
        assert_eq!(record.channels, 3);
        assert_eq!(record.width, 16);
        assert_eq!(record.height, 12);
        // Canonical bytes must decode as 3-channel JPEG
        let decoded =
            image::load_from_memory_with_format(&record.encoded, image::ImageFormat::Jpeg)
                .unwrap();
        assert_eq!(decoded.color().channel_count(), 3);
    }

    // JPEG inputs pass through bit-for-bit
    let original = fs::read(input.path().join("a_photo.jpg")).unwrap();
    assert_eq!(records[0].encoded, original);
}

#[test]
fn test_grayscale_jpeg_is_skipped() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let config = ImageConfig::default();

    generate_jpeg(&input.path().join("a.jpg"), &config).unwrap();
    generate_gray_jpeg(&input.path().join("b_gray.jpg"), &config).unwrap();
    generate_jpeg(&input.path().join("c.jpg"), &config).unwrap();

    let report = run_pipeline(input.path(), output.path(), 1, 1);

    assert_eq!(report.written, 2);
    assert_eq!(report.skipped, 1);

    let records = shard_records(output.path(), 0, 1);
    let names: Vec<&str> = records.iter().map(|r| r.filename.as_str()).collect();
    assert_eq!(names, vec!["a.jpg", "c.jpg"]);
}

#[test]
fn test_shard_write_failure_propagates() {
    let input = TempDir::new().unwrap();
    let output_parent = TempDir::new().unwrap();
    generate_library(input.path(), 2).unwrap();

    // Using a plain file as the output directory makes shard creation fail
    let bogus_output = output_parent.path().join("not_a_directory");
    fs::write(&bogus_output, b"occupied").unwrap();

    let config = config_for(input.path(), &bogus_output, 2, 1);
    let files = discover(&config.input).unwrap();
    match Pipeline::new(config).run("lab", &files) {
        Err(ConvertError::Shard { .. }) => {}
        other => panic!("expected shard error, got {:?}", other),
    }
}

#[test]
fn test_more_shards_than_files_leaves_empty_shards() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    generate_library(input.path(), 3).unwrap();

    let report = run_pipeline(input.path(), output.path(), 6, 2);

    assert_eq!(report.written, 3);
    assert_eq!(report.shard_files(), 6);

    let sizes: Vec<usize> = (0..6)
        .map(|i| shard_records(output.path(), i, 6).len())
        .collect();
    assert_eq!(sizes.iter().sum::<usize>(), 3);
    assert!(sizes.contains(&0), "some shard must stay empty: {:?}", sizes);
}
