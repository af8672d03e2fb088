//! Prepared-statement style cursor over a materialized result sequence.

use crate::dispatch::{self, Outcome};
use crate::engine::SimDb;
use crate::record::{Record, Value};

/// A prepared descriptor plus, after [`Statement::execute`], its
/// materialized result rows.
///
/// `fetch` is stateful and advances one row at a time; `fetch_all` and
/// `fetch_column` always operate on the full materialized sequence and
/// neither consume nor move the `fetch` position.
pub struct Statement<'db> {
    db: &'db mut SimDb,
    descriptor: String,
    rows: Vec<Record>,
    position: usize,
}

impl<'db> Statement<'db> {
    pub(crate) fn new(db: &'db mut SimDb, descriptor: String) -> Self {
        Statement {
            db,
            descriptor,
            rows: Vec::new(),
            position: 0,
        }
    }

    /// Runs the descriptor with the positionally substituted `params`.
    ///
    /// Selection descriptors materialize their rows and return `true`
    /// (an empty result is not a failure); mutating descriptors report
    /// whether a row was written.
    pub fn execute(&mut self, params: &[Value]) -> bool {
        self.position = 0;
        match dispatch::execute(self.db, &self.descriptor, params) {
            Outcome::Rows(rows) => {
                self.rows = rows;
                true
            }
            Outcome::Changed(changed) => {
                self.rows = Vec::new();
                changed
            }
        }
    }

    /// Returns the row at the cursor and advances past it.
    pub fn fetch(&mut self) -> Option<Record> {
        let row = self.rows.get(self.position).cloned();
        if row.is_some() {
            self.position += 1;
        }
        row
    }

    /// Returns every materialized row; the cursor position is untouched.
    pub fn fetch_all(&self) -> Vec<Record> {
        self.rows.clone()
    }

    /// Value at `column` (by position) in the first row, regardless of the
    /// cursor position.
    pub fn fetch_column(&self, column: usize) -> Option<Value> {
        self.rows
            .first()
            .and_then(|row| row.column_at(column).cloned())
    }
}
