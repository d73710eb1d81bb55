//! Storage traits and error types
//!
//! This module defines the trait interface for table storage backends and
//! associated error types.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to write table '{table}': {source}")]
    Write {
        table: String,
        source: csv::Error,
    },

    #[error("Failed to read table '{table}': {source}")]
    Read {
        table: String,
        source: csv::Error,
    },

    #[error("Table lock poisoned for '{0}'")]
    LockPoisoned(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for appending uniform record batches to named tables
///
/// Implementations create the table (and its header row) on first use and
/// append thereafter without re-writing the header. Concurrent appends to the
/// same table must be serialized by the implementation; appends to different
/// tables are independent.
pub trait TableWriter {
    /// Appends a batch of records to the named table
    ///
    /// An empty batch is a no-op and does not create the table.
    ///
    /// # Arguments
    ///
    /// * `table` - The table name (without extension)
    /// * `rows` - The records to append, in order
    fn append<T: Serialize>(&self, table: &str, rows: &[T]) -> StorageResult<()>;
}

/// Trait for loading a previously written table fully into memory
pub trait TableReader {
    /// Reads every record of the named table, in file order
    fn read_all<T: DeserializeOwned>(&self, table: &str) -> StorageResult<Vec<T>>;
}
