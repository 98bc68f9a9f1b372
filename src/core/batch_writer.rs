//! Batched concurrent record writer
//!
//! Partitions parsed records into fixed-size batches and writes them to
//! the repository in waves of bounded concurrency. Each wave is fully
//! joined before its counts are folded into the running totals, so the
//! `saved`/`skipped` counters are never touched concurrently.
//!
//! # Failure Handling
//!
//! - Dropping the superseded uniqueness index happens once, before the
//!   first batch; "index not found" is a no-op, anything else aborts the
//!   whole upload. This is the one fatal path in ingestion.
//! - Duplicate-key rejections are non-fatal: the accepted part of the
//!   batch counts as saved, the rejected part as skipped.
//! - Any other insert failure is logged and the batch counts as fully
//!   skipped; remaining batches proceed.
//! - `saved + skipped` always equals the number of records submitted.

use std::sync::Arc;

use crate::repository::{OrderRepository, SUPERSEDED_UNIQUE_INDEX};
use crate::types::{OrderError, OrderRecord, RepositoryError};

/// Configuration for batch writing
///
/// Controls how records are batched and how many batches are in flight
/// per wave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchConfig {
    /// Number of records per insert batch
    pub batch_size: usize,
    /// Maximum number of batches written concurrently in one wave
    pub max_concurrent_batches: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 2000,
            max_concurrent_batches: 5,
        }
    }
}

impl BatchConfig {
    /// Create a BatchConfig, falling back to defaults for zero values
    pub fn new(batch_size: usize, max_concurrent_batches: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            tracing::warn!(
                provided = batch_size,
                fallback = default.batch_size,
                "invalid batch_size, using default"
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent_batches = if max_concurrent_batches == 0 {
            tracing::warn!(
                provided = max_concurrent_batches,
                fallback = default.max_concurrent_batches,
                "invalid max_concurrent_batches, using default"
            );
            default.max_concurrent_batches
        } else {
            max_concurrent_batches
        };

        Self {
            batch_size,
            max_concurrent_batches,
        }
    }
}

/// Saved/skipped tally of one write run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteSummary {
    /// Records accepted by the storage layer
    pub saved: usize,
    /// Records rejected as duplicates or lost to batch failures
    pub skipped: usize,
}

/// Batched concurrent writer over an [`OrderRepository`]
#[derive(Clone)]
pub struct BatchWriter {
    repository: Arc<dyn OrderRepository>,
    config: BatchConfig,
}

impl BatchWriter {
    /// Create a new BatchWriter
    pub fn new(repository: Arc<dyn OrderRepository>, config: BatchConfig) -> Self {
        Self { repository, config }
    }

    /// Write all records in waves of concurrent batches
    ///
    /// # Returns
    ///
    /// * `Ok(WriteSummary)` with `saved + skipped == records.len()`
    /// * `Err(OrderError::IndexDrop)` if the superseded index exists but
    ///   cannot be dropped; no batch is written in that case
    pub async fn write(&self, records: Vec<OrderRecord>) -> Result<WriteSummary, OrderError> {
        match self.repository.drop_index(SUPERSEDED_UNIQUE_INDEX).await {
            Ok(()) => {
                tracing::debug!(index = SUPERSEDED_UNIQUE_INDEX, "dropped superseded index");
            }
            Err(RepositoryError::IndexNotFound { .. }) => {
                tracing::debug!(index = SUPERSEDED_UNIQUE_INDEX, "superseded index already absent");
            }
            Err(source) => {
                return Err(OrderError::IndexDrop {
                    name: SUPERSEDED_UNIQUE_INDEX.to_string(),
                    source,
                });
            }
        }

        let submitted = records.len();
        let mut summary = WriteSummary::default();

        let mut batches = Vec::new();
        let mut remaining = records.into_iter();
        loop {
            let batch: Vec<OrderRecord> = remaining.by_ref().take(self.config.batch_size).collect();
            if batch.is_empty() {
                break;
            }
            batches.push(batch);
        }

        let mut pending = batches.into_iter();
        loop {
            let wave: Vec<Vec<OrderRecord>> = pending
                .by_ref()
                .take(self.config.max_concurrent_batches)
                .collect();
            if wave.is_empty() {
                break;
            }

            let mut handles = Vec::with_capacity(wave.len());
            for batch in wave {
                let repository = Arc::clone(&self.repository);
                let size = batch.len();
                handles.push((
                    size,
                    tokio::spawn(async move { write_batch(repository, batch).await }),
                ));
            }

            // Join the whole wave before folding counts; the counters are
            // only mutated here, never inside a batch task.
            for (size, handle) in handles {
                match handle.await {
                    Ok(outcome) => {
                        summary.saved += outcome.saved;
                        summary.skipped += outcome.skipped;
                    }
                    Err(error) => {
                        tracing::error!(%error, records = size, "batch task failed, skipping");
                        summary.skipped += size;
                    }
                }
            }
        }

        debug_assert_eq!(summary.saved + summary.skipped, submitted);
        Ok(summary)
    }
}

/// Insert one batch with unordered semantics and tally the outcome
async fn write_batch(repository: Arc<dyn OrderRepository>, batch: Vec<OrderRecord>) -> WriteSummary {
    let attempted = batch.len();
    if attempted == 0 {
        return WriteSummary::default();
    }

    match repository.insert_many(&batch, false).await {
        Ok(inserted) => WriteSummary {
            saved: inserted,
            skipped: attempted.saturating_sub(inserted),
        },
        Err(RepositoryError::DuplicateKey { inserted, .. }) => {
            let skipped = attempted.saturating_sub(inserted);
            tracing::warn!(skipped, attempted, "duplicate records found, skipping");
            WriteSummary {
                saved: inserted,
                skipped,
            }
        }
        Err(error) => {
            tracing::warn!(%error, records = attempted, "failed to insert batch, skipping");
            WriteSummary {
                saved: 0,
                skipped: attempted,
            }
        }
    }
}
