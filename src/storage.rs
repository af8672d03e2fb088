//! Whole-file persistence: one pretty-printed JSON document per table and
//! one auxiliary document for the identifier counters.
//!
//! There are no row-level writes. A save serializes the table's full record
//! sequence and overwrites its document in a single write, then refreshes
//! the counter document. A document that cannot be decoded degrades to the
//! empty table rather than failing the load; the loss is logged and the
//! seeding pass repopulates reference tables.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::warn;

use crate::db_error::DbError;
use crate::record::Record;
use crate::table::{Table, Tables, TABLE_NAMES};

const COUNTER_FILE: &str = "counters.json";

pub(crate) fn ensure_dir(dir: &Path) -> Result<(), DbError> {
    fs::create_dir_all(dir)?;
    Ok(())
}

fn table_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.json"))
}

/// Replaces every table with its persisted document, then restores the
/// counters. Missing documents leave tables empty. Persisted counter values
/// are merged over the defaults (never letting one regress), and every
/// counter is raised past the highest loaded id.
pub(crate) fn load(dir: &Path, tables: &mut Tables) {
    for name in TABLE_NAMES {
        let rows = load_rows(dir, name);
        if let Some(table) = tables.by_name_mut(name) {
            table.replace_rows(rows);
        }
    }

    let counters = load_counters(dir);
    for name in TABLE_NAMES {
        if let Some(table) = tables.by_name_mut(name) {
            if let Some(&persisted) = counters.get(name) {
                if persisted > table.next_id() {
                    table.set_next_id(persisted);
                }
            }
            table.enforce_id_floor();
        }
    }
}

fn load_rows(dir: &Path, name: &str) -> Vec<Record> {
    let path = table_path(dir, name);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(_) => return Vec::new(),
    };

    match serde_json::from_str(&content) {
        Ok(rows) => rows,
        Err(err) => {
            warn!(
                "undecodable table document {}: {err}; treating table as empty",
                path.display()
            );
            Vec::new()
        }
    }
}

fn load_counters(dir: &Path) -> BTreeMap<String, u64> {
    let path = dir.join(COUNTER_FILE);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(_) => return BTreeMap::new(),
    };

    match serde_json::from_str(&content) {
        Ok(counters) => counters,
        Err(err) => {
            warn!(
                "undecodable counter document {}: {err}; keeping defaults",
                path.display()
            );
            BTreeMap::new()
        }
    }
}

/// Overwrites one table's document, then the counter document.
pub(crate) fn save_table(dir: &Path, name: &str, tables: &Tables) -> Result<(), DbError> {
    if let Some(table) = tables.by_name(name) {
        write_rows(dir, name, table)?;
    }
    write_counters(dir, tables)
}

/// Overwrites every table document and the counter document.
pub(crate) fn save_all(dir: &Path, tables: &Tables) -> Result<(), DbError> {
    for (name, table) in tables.entries() {
        write_rows(dir, name, table)?;
    }
    write_counters(dir, tables)
}

fn write_rows(dir: &Path, name: &str, table: &Table) -> Result<(), DbError> {
    let json = serde_json::to_string_pretty(table.rows())?;
    fs::write(table_path(dir, name), json)?;
    Ok(())
}

fn write_counters(dir: &Path, tables: &Tables) -> Result<(), DbError> {
    let counters: BTreeMap<&str, u64> = tables
        .entries()
        .iter()
        .map(|(name, table)| (*name, table.next_id()))
        .collect();
    let json = serde_json::to_string_pretty(&counters)?;
    fs::write(dir.join(COUNTER_FILE), json)?;
    Ok(())
}
