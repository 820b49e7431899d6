//! Size-bounded batch planning for model submission
//!
//! The service accepts at most [`MAX_MODELS_PER_REQUEST`] models in a single
//! create request. Larger working sets are split into smaller chunks of
//! [`UPLOAD_BATCH_SIZE`], which keeps individual request bodies well below
//! the service's payload limits.

/// Maximum number of models allowed in a single create request
pub const MAX_MODELS_PER_REQUEST: usize = 250;

/// Chunk size used once the working set exceeds the per-request maximum
pub const UPLOAD_BATCH_SIZE: usize = 40;

/// Partitions an ordered sequence into contiguous batches.
///
/// Order is preserved within and across batches, so a dependency-sorted
/// input stays dependency-sorted as long as batches are submitted in
/// sequence. Below the per-request maximum everything fits in one batch;
/// at or above it the sequence is chunked, with the last chunk holding the
/// remainder.
pub fn plan_batches<T>(models: &[T]) -> Vec<&[T]> {
    if models.is_empty() {
        return Vec::new();
    }

    if models.len() < MAX_MODELS_PER_REQUEST {
        return vec![models];
    }

    models.chunks(UPLOAD_BATCH_SIZE).collect()
}
