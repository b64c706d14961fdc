//! Static work partitioning
//!
//! The input list is cut into one contiguous half-open range per worker
//! thread. Boundaries are linearly interpolated across the list and
//! floored to integers, so range sizes differ by at most one and the
//! ranges exactly cover `[0, total)` even when the list does not divide
//! evenly.

/// Half-open span of input-list indices assigned to one worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexRange {
    /// First index in the span
    pub start: usize,
    /// One past the last index in the span
    pub end: usize,
}

impl IndexRange {
    /// Number of indices in the span.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True when the span holds no indices.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Interpolated boundary `i` of a division of `total` items into `parts`.
///
/// Widened arithmetic keeps the product exact for any realistic list size.
fn boundary(total: usize, parts: usize, i: usize) -> usize {
    (total as u128 * i as u128 / parts as u128) as usize
}

/// Splits `[0, total)` into `parts` contiguous half-open ranges.
///
/// `total = 0` yields all-empty ranges; `parts = 0` yields an empty list.
/// Deterministic: equal inputs always produce equal ranges.
pub fn partition(total: usize, parts: usize) -> Vec<IndexRange> {
    (0..parts)
        .map(|i| IndexRange {
            start: boundary(total, parts, i),
            end: boundary(total, parts, i + 1),
        })
        .collect()
}
