//! Harvest module for listing and comment-thread collection
//!
//! This module contains the core harvesting logic, including:
//! - HTTP session management and retried fetching
//! - Envelope parsing for listing and detail responses
//! - Listing and detail collectors
//! - Batch-limited concurrent fan-out over discovered items
//! - Overall pipeline coordination

mod collector;
mod coordinator;
mod fetcher;
mod parser;
mod scheduler;

pub use collector::{collect_detail, collect_listing};
pub use coordinator::run_harvest;
pub use fetcher::{
    build_http_client, fetch_with_retry, FetchError, Fetcher, HttpSession, HttpSessionFactory,
    SessionFactory,
};
pub use parser::{parse_comments, parse_listing, ParseError};
pub use scheduler::{run_batches, BatchStats};

use crate::config::Config;
use serde::{Deserialize, Serialize};

/// One entry from a listing feed
///
/// Uniqueness key is the title, scoped to a single listing collection call.
/// Field declaration order defines the CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub title: String,
    pub author: String,
    pub permalink: String,
    pub upvote_ratio: f64,
}

/// One comment node from an item's detail thread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentRecord {
    pub author: String,
    pub body: String,
    pub upvotes: i64,
}

/// Runs a complete harvest operation
///
/// This is the main entry point. It will:
/// 1. Build the shared session factory and CSV store
/// 2. Collect each configured listing into an item table
/// 3. Fan out over every item table with bounded concurrency,
///    writing one comment table per item
///
/// # Arguments
///
/// * `config` - The harvest configuration
///
/// # Returns
///
/// * `Ok(())` - Harvest completed
/// * `Err(HarvestError)` - Harvest failed
pub async fn harvest(config: Config) -> crate::Result<()> {
    run_harvest(config).await
}
