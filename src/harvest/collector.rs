//! Listing and detail collectors
//!
//! The listing collector pulls one page of a feed, deduplicates items by
//! title within the call, and appends each newly-seen item to the listing's
//! table. The detail collector pulls one item's comment thread and appends
//! its comments to a table named after the item's permalink slug.

use crate::config::HarvestConfig;
use crate::harvest::fetcher::{fetch_with_retry, SessionFactory};
use crate::harvest::parser::{parse_comments, parse_listing};
use crate::harvest::ItemRecord;
use crate::storage::TableWriter;
use crate::url::{derive_table_name, detail_url, listing_url};
use crate::{HarvestError, Result};
use std::collections::HashSet;

/// Collects one listing feed into its item table
///
/// Performs a single retried fetch for the whole listing (the page-size limit
/// caps total items; pagination beyond one page is out of scope). Items are
/// processed in response order; duplicates by exact title are skipped, and
/// each newly-seen record is appended immediately so a later failure keeps
/// the rows already written.
///
/// A response that fails to parse, or parses to an empty envelope, yields
/// zero items without error. Exhausting the fetch retries aborts the listing.
///
/// # Returns
///
/// The unique items in first-seen order, as persisted.
pub async fn collect_listing<F, S>(
    factory: &F,
    store: &S,
    config: &HarvestConfig,
    listing: &str,
) -> Result<Vec<ItemRecord>>
where
    F: SessionFactory,
    S: TableWriter,
{
    let url = listing_url(&config.base_url, listing, config.page_limit)?;

    let body = fetch_with_retry(factory, &url, config.max_retries, false, listing)
        .await
        .map_err(|source| HarvestError::ListingFailed {
            listing: listing.to_string(),
            source,
        })?;

    let items = match parse_listing(&body) {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!("Listing '{}' response did not parse: {}", listing, e);
            Vec::new()
        }
    };

    // Dedup memory is scoped to this call; duplicates across runs are accepted
    let mut seen: HashSet<String> = HashSet::new();
    let mut collected = Vec::new();

    for item in items {
        if !seen.insert(item.title.clone()) {
            tracing::debug!("Skipping duplicate title in '{}': {}", listing, item.title);
            continue;
        }

        store.append(listing, std::slice::from_ref(&item))?;
        collected.push(item);
    }

    tracing::info!("Listing '{}': {} unique item(s) written", listing, collected.len());
    Ok(collected)
}

/// Collects one item's comment thread into its own table
///
/// The destination table is named from the permalink slug. The fetch requires
/// a non-empty body; an empty response counts as a failed attempt and is
/// retried. When all attempts are exhausted the item is skipped with a
/// warning, never failing the caller.
///
/// An empty comment list is vacuously successful: nothing is written, no
/// further retries happen. Each comment is appended as it is mapped, so the
/// call counts as written once the first row lands. Write errors are hard
/// errors.
///
/// # Returns
///
/// * `Ok(true)` - At least one comment was written
/// * `Ok(false)` - Nothing was written (empty thread, exhausted retries, or
///   an unparseable response)
/// * `Err(HarvestError)` - Persistence failed or the permalink was malformed
pub async fn collect_detail<F, S>(
    factory: &F,
    store: &S,
    config: &HarvestConfig,
    item: &ItemRecord,
) -> Result<bool>
where
    F: SessionFactory,
    S: TableWriter,
{
    let table = derive_table_name(&item.permalink)?;
    let url = detail_url(&config.base_url, &item.permalink)?;

    let body = match fetch_with_retry(factory, &url, config.max_retries, true, &table).await {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!("Max retries exceeded for {}: {}", item.permalink, e);
            return Ok(false);
        }
    };

    let comments = match parse_comments(&body) {
        Ok(comments) => comments,
        Err(e) => {
            // A malformed payload will not improve on re-fetch; skip the item
            tracing::warn!("Detail response for '{}' did not parse: {}", table, e);
            return Ok(false);
        }
    };

    if comments.is_empty() {
        tracing::debug!("No comments for '{}'", table);
        return Ok(false);
    }

    let mut written = false;
    for comment in &comments {
        store.append(&table, std::slice::from_ref(comment))?;
        written = true;
    }

    tracing::debug!("Wrote {} comment(s) to '{}'", comments.len(), table);
    Ok(written)
}
