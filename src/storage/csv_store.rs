//! CSV-backed table storage
//!
//! Tables are plain CSV files under a data directory, one file per table,
//! named `{table}.csv`. The header row is written once when the file is
//! created (or is empty) and appends never duplicate it.

use crate::storage::traits::{StorageError, StorageResult, TableReader, TableWriter};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Append-only CSV table store
///
/// Cloneable handle; clones share the per-table lock registry, so concurrent
/// appends to the same table from parallel tasks are serialized while
/// different tables proceed independently.
#[derive(Clone)]
pub struct CsvStore {
    data_dir: PathBuf,
    locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl CsvStore {
    /// Creates a store rooted at the given data directory
    ///
    /// The directory is created lazily on the first append.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Returns the file path for a table name
    pub fn table_path(&self, table: &str) -> PathBuf {
        self.data_dir.join(format!("{}.csv", table))
    }

    fn table_lock(&self, table: &str) -> StorageResult<Arc<Mutex<()>>> {
        let mut registry = self
            .locks
            .lock()
            .map_err(|_| StorageError::LockPoisoned(table.to_string()))?;
        Ok(registry
            .entry(table.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone())
    }

    fn needs_header(path: &Path) -> StorageResult<bool> {
        if !path.exists() {
            return Ok(true);
        }
        Ok(std::fs::metadata(path)?.len() == 0)
    }
}

impl TableWriter for CsvStore {
    fn append<T: Serialize>(&self, table: &str, rows: &[T]) -> StorageResult<()> {
        if rows.is_empty() {
            return Ok(());
        }

        let lock = self.table_lock(table)?;
        let _guard = lock
            .lock()
            .map_err(|_| StorageError::LockPoisoned(table.to_string()))?;

        std::fs::create_dir_all(&self.data_dir)?;

        let path = self.table_path(table);
        let needs_header = Self::needs_header(&path)?;

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);

        for row in rows {
            writer.serialize(row).map_err(|source| StorageError::Write {
                table: table.to_string(),
                source,
            })?;
        }

        writer.flush()?;
        tracing::debug!("Appended {} row(s) to table '{}'", rows.len(), table);
        Ok(())
    }
}

impl TableReader for CsvStore {
    fn read_all<T: DeserializeOwned>(&self, table: &str) -> StorageResult<Vec<T>> {
        let path = self.table_path(table);
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&path)
            .map_err(|source| StorageError::Read {
                table: table.to_string(),
                source,
            })?;

        let mut records = Vec::new();
        for row in reader.deserialize() {
            let record: T = row.map_err(|source| StorageError::Read {
                table: table.to_string(),
                source,
            })?;
            records.push(record);
        }

        Ok(records)
    }
}
