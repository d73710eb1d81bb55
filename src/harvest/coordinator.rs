//! Harvest coordinator - main pipeline orchestration
//!
//! This module ties the stages together:
//! - One shared session factory for the whole run
//! - A listing pass that writes one item table per configured feed
//! - A batch fan-out pass that writes one comment table per item

use crate::config::Config;
use crate::harvest::collector::collect_listing;
use crate::harvest::fetcher::HttpSessionFactory;
use crate::harvest::scheduler::run_batches;
use crate::storage::CsvStore;
use crate::Result;

/// Runs the complete harvest pipeline
///
/// Every configured listing is collected first; a listing whose fetch never
/// succeeds is logged and dropped from the fan-out pass without aborting the
/// run. The session factory is shared by reference across all stages and
/// released exactly once when the run ends.
pub async fn run_harvest(config: Config) -> Result<()> {
    let store = CsvStore::new(&config.output.data_dir);
    let factory = HttpSessionFactory::new(config.client.clone(), config.proxy.clone());

    tracing::info!(
        "Starting harvest: {} listing(s), batch size {}, {} retries",
        config.harvest.listings.len(),
        config.harvest.batch_size,
        config.harvest.max_retries
    );

    // Listing pass: one item table per feed
    let mut tables = Vec::new();
    let mut total_items = 0;
    for listing in &config.harvest.listings {
        match collect_listing(&factory, &store, &config.harvest, listing).await {
            Ok(items) if items.is_empty() => {
                // No items means no table file was created; nothing to fan out
                tracing::info!("Listing '{}' produced no items", listing);
            }
            Ok(items) => {
                total_items += items.len();
                tables.push(listing.clone());
            }
            Err(e) => {
                tracing::error!("Skipping listing '{}': {}", listing, e);
            }
        }
    }

    // Fan-out pass: drain each item table with bounded concurrency
    let mut total_written = 0;
    let mut total_skipped = 0;
    let mut total_failed = 0;
    for table in &tables {
        let stats = run_batches(&factory, &store, &config.harvest, table).await?;
        total_written += stats.written;
        total_skipped += stats.skipped;
        total_failed += stats.failed;
    }

    tracing::info!(
        "Harvest complete: {} item(s) across {} table(s); {} thread(s) written, {} skipped, {} failed",
        total_items,
        tables.len(),
        total_written,
        total_skipped,
        total_failed
    );

    Ok(())
}
