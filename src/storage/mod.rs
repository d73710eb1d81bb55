//! Storage module for persisting harvested records
//!
//! This module handles all table persistence for the harvester:
//! - Append-only CSV tables with idempotent header handling
//! - Full-table reads for the batch fan-out stage
//! - Per-table serialization of concurrent appends

mod csv_store;
mod traits;

pub use csv_store::CsvStore;
pub use traits::{StorageError, StorageResult, TableReader, TableWriter};
