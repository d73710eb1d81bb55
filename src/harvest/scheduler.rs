//! Batch scheduler for bounded-concurrency detail collection
//!
//! This module drains an item table in fixed-size batches, running the
//! detail collector concurrently for every item in a batch and waiting for
//! the whole batch to settle before the next one starts. Peak concurrent
//! session usage is therefore bounded by the batch size regardless of table
//! size.

use crate::config::HarvestConfig;
use crate::harvest::collector::collect_detail;
use crate::harvest::fetcher::SessionFactory;
use crate::harvest::ItemRecord;
use crate::storage::{TableReader, TableWriter};
use crate::Result;
use futures::future::join_all;

/// Outcome counts for one batch-scheduled table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    /// Number of batches launched
    pub batches: usize,
    /// Total items read from the table
    pub items: usize,
    /// Items with at least one comment written
    pub written: usize,
    /// Items that completed with nothing to write
    pub skipped: usize,
    /// Items whose task failed with an error
    pub failed: usize,
}

/// Runs detail collection over a full item table in bounded batches
///
/// The table is loaded fully into memory, then drained from the front in
/// `batch_size` chunks. Every item in a chunk runs concurrently; the next
/// chunk never starts before all tasks of the current one have settled.
/// Fail-soft: one item's error is logged and counted, it neither cancels
/// siblings nor halts the scheduler.
///
/// # Arguments
///
/// * `factory` - The shared session factory
/// * `store` - Table storage (read for items, written for comments)
/// * `config` - The harvest configuration (batch size, retries)
/// * `table` - The item table to drain
///
/// # Returns
///
/// * `Ok(BatchStats)` - Per-table outcome counts
/// * `Err(HarvestError)` - The item table could not be read
pub async fn run_batches<F, S>(
    factory: &F,
    store: &S,
    config: &HarvestConfig,
    table: &str,
) -> Result<BatchStats>
where
    F: SessionFactory,
    S: TableWriter + TableReader,
{
    let items: Vec<ItemRecord> = store.read_all(table)?;

    let mut stats = BatchStats {
        items: items.len(),
        ..BatchStats::default()
    };

    for batch in items.chunks(config.batch_size) {
        stats.batches += 1;
        tracing::debug!(
            "Launching batch {} of {} item(s) for table '{}'",
            stats.batches,
            batch.len(),
            table
        );

        let tasks = batch
            .iter()
            .map(|item| collect_detail(factory, store, config, item));
        let results = join_all(tasks).await;

        for (item, result) in batch.iter().zip(results) {
            match result {
                Ok(true) => stats.written += 1,
                Ok(false) => stats.skipped += 1,
                Err(e) => {
                    stats.failed += 1;
                    tracing::error!("Detail task for '{}' failed: {}", item.permalink, e);
                }
            }
        }
    }

    tracing::info!(
        "Table '{}': {} item(s) in {} batch(es), {} written, {} skipped, {} failed",
        table,
        stats.items,
        stats.batches,
        stats.written,
        stats.skipped,
        stats.failed
    );

    Ok(stats)
}
