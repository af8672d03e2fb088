//! Engine state: the fixed table set, the data directory, and the
//! engine-wide last-insert-id scalar. Construction performs the full load
//! (and seeds reference data); every mutating handler performs its own save.

use std::path::{Path, PathBuf};

use log::info;

use crate::db_error::DbError;
use crate::record::{Record, Value};
use crate::seed;
use crate::statement::Statement;
use crate::storage;
use crate::table::Tables;

/// File-backed simulated database engine.
///
/// An instance is intended to live for one unit of work: it loads every
/// table from disk when opened and flushes affected tables immediately
/// after each mutation. Nothing coordinates concurrent instances over the
/// same directory; overlapping writers can lose updates to each other.
pub struct SimDb {
    pub(crate) data_dir: PathBuf,
    pub(crate) tables: Tables,
    pub(crate) last_insert_id: u64,
}

impl SimDb {
    /// Opens the engine against `data_dir`, creating the directory if
    /// absent, loading every table document, and seeding reference data
    /// into any table that is still empty.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self, DbError> {
        let data_dir = data_dir.into();
        storage::ensure_dir(&data_dir)?;

        let mut tables = Tables::new();
        storage::load(&data_dir, &mut tables);

        if seed::populate_empty_tables(&mut tables) {
            storage::save_all(&data_dir, &tables)?;
            info!("seeded reference data into {}", data_dir.display());
        }

        Ok(SimDb {
            data_dir,
            tables,
            last_insert_id: 0,
        })
    }

    /// Prepares a statement for the given query descriptor. Nothing is
    /// inspected until [`Statement::execute`] runs.
    pub fn prepare(&mut self, descriptor: impl Into<String>) -> Statement<'_> {
        Statement::new(self, descriptor.into())
    }

    /// Session-level commands (`SET time_zone`, ...) are accepted and
    /// ignored.
    pub fn exec(&mut self, _descriptor: &str) -> bool {
        true
    }

    /// Identifier allocated by the most recent insert on this instance.
    /// Zero until the first insert; stale after the next one.
    pub fn last_insert_id(&self) -> u64 {
        self.last_insert_id
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// First matching row, if any.
    pub fn single_row(&mut self, descriptor: &str, params: &[Value]) -> Option<Record> {
        let mut stmt = self.prepare(descriptor);
        stmt.execute(params);
        stmt.fetch()
    }

    /// Every matching row.
    pub fn multiple_rows(&mut self, descriptor: &str, params: &[Value]) -> Vec<Record> {
        let mut stmt = self.prepare(descriptor);
        stmt.execute(params);
        stmt.fetch_all()
    }

    /// First column of the first matching row, if any.
    pub fn single_value(&mut self, descriptor: &str, params: &[Value]) -> Option<Value> {
        let mut stmt = self.prepare(descriptor);
        stmt.execute(params);
        stmt.fetch_column(0)
    }
}
