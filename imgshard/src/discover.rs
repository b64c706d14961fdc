//! Input file discovery
//!
//! Lists the entries directly under the input root and pairs every entry
//! with the single active class label. The listing is deliberately
//! lenient: no extension filter and no file-type probe, so non-image
//! entries reach the conversion workers and are skipped there with a
//! logged reason instead of being second-guessed here.

use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use thiserror::Error;
use walkdir::WalkDir;

// Label index 0 is reserved for a future background class
const ACTIVE_LABEL: i64 = 1;
const ACTIVE_LABEL_TEXT: &str = "1";

/// Discovery errors
#[derive(Debug, Error)]
pub enum DiscoverError {
    /// Input path does not exist
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// Input path exists but is not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Parallel per-file sequences consumed by the conversion workers
///
/// `filenames[i]`, `labels[i]` and `texts[i]` describe the same input.
/// The sequences are shared read-only across all workers for the duration
/// of a run.
#[derive(Debug, Clone, Default)]
pub struct DiscoveredFiles {
    pub filenames: Vec<PathBuf>,
    pub labels: Vec<i64>,
    pub texts: Vec<String>,
}

impl DiscoveredFiles {
    /// Number of discovered inputs.
    pub fn len(&self) -> usize {
        self.filenames.len()
    }

    /// True when nothing was discovered.
    pub fn is_empty(&self) -> bool {
        self.filenames.is_empty()
    }

    /// Reorders all parallel sequences with one seeded permutation.
    ///
    /// Reproducible for a fixed seed, so repeated runs cut a future
    /// train/validation split the same way.
    pub fn shuffle(&mut self, seed: u64) {
        let perm = seeded_permutation(self.len(), seed);
        self.filenames = apply_permutation(&self.filenames, &perm);
        self.labels = apply_permutation(&self.labels, &perm);
        self.texts = apply_permutation(&self.texts, &perm);
    }
}

/// Generates the index permutation a fixed `seed` always produces.
pub fn seeded_permutation(len: usize, seed: u64) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..len).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);
    indices
}

/// Applies one permutation to a sequence.
///
/// Parallel sequences permuted with the same `perm` travel together.
/// `perm` must be a permutation of `0..items.len()`.
pub fn apply_permutation<T: Clone>(items: &[T], perm: &[usize]) -> Vec<T> {
    perm.iter().map(|&i| items[i].clone()).collect()
}

/// Lists the entries directly under `root`, sorted by file name, and
/// assigns every entry the active label.
///
/// Subdirectories and non-image files are listed too; the per-image skip
/// path downstream weeds them out.
pub fn discover(root: &Path) -> Result<DiscoveredFiles, DiscoverError> {
    if !root.exists() {
        return Err(DiscoverError::PathNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(DiscoverError::NotADirectory(root.to_path_buf()));
    }

    let mut filenames = Vec::new();
    let walker = WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();
    for entry in walker {
        match entry {
            Ok(entry) => filenames.push(entry.path().to_path_buf()),
            Err(e) => {
                // Continue listing, don't abort
                tracing::warn!("Error accessing entry: {}", e);
            }
        }
    }

    let labels = vec![ACTIVE_LABEL; filenames.len()];
    let texts = vec![ACTIVE_LABEL_TEXT.to_string(); filenames.len()];

    tracing::debug!(files = filenames.len(), "Discovery complete");

    Ok(DiscoveredFiles {
        filenames,
        labels,
        texts,
    })
}
