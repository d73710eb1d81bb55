//! Feedharvest: a feed and comment-thread harvester
//!
//! This crate fetches paginated listings and nested comment threads from a
//! public content-aggregation API, deduplicates records, and persists them as
//! append-only CSV tables, with bounded retries, an optional forwarding proxy,
//! and batch-limited concurrent detail fetches.

pub mod config;
pub mod harvest;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for feedharvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Listing '{listing}' could not be fetched: {source}")]
    ListingFailed {
        listing: String,
        source: harvest::FetchError,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Malformed permalink: {0}")]
    MalformedPermalink(String),
}

/// Result type alias for feedharvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use harvest::{CommentRecord, ItemRecord};
pub use storage::{CsvStore, TableReader, TableWriter};
