//! # FitConnect Simulated Database
//!
//! A small, file-backed record store that stands in for a relational
//! database. Tables live in memory as ordered record collections, persist as
//! one pretty-printed JSON document each, and answer a closed vocabulary of
//! query intents by matching the *shape* of a request instead of parsing a
//! query language.
//!
//! ## Features
//!
//! - **JSON document per table**: human-readable array-of-objects files
//!   under a configured data directory, rewritten whole on every mutation
//! - **Surrogate identifiers**: per-table monotonic counters, persisted so
//!   ids survive restarts and are never reused
//! - **Shape-matched dispatch**: descriptors are classified by verb and
//!   routed through an ordered recognizer list; no parser, no extensibility
//! - **Prepared-statement cursors**: `prepare` / `execute` / `fetch` /
//!   `fetch_all` / `fetch_column`, mimicking the driver interface the rest
//!   of the application expects
//! - **Reference seeding**: empty tables are populated with the fixture
//!   dataset on first load and flushed back immediately
//! - **Soft failure**: missing or undecodable documents degrade to empty
//!   tables; absent rows are empty results, never errors
//!
//! ## Quick Start
//!
//! ```no_run
//! use fitconnect_simdb::{SimDb, Value};
//!
//! let mut db = SimDb::open("data").expect("data directory should be usable");
//!
//! // Credential lookup, routed by the shape of the descriptor.
//! let mut stmt = db.prepare(
//!     "SELECT id, username, email, password_hash, user_type, first_name, last_name, \
//!      phone, profile_image, status, created_at \
//!      FROM users WHERE email = ? AND status = 'active'",
//! );
//! stmt.execute(&[Value::from("john@example.com")]);
//! if let Some(user) = stmt.fetch() {
//!     println!("found {:?}", user.str_col("username"));
//! }
//! drop(stmt);
//!
//! // Scalar aggregate through the convenience helper.
//! let active_services =
//!     db.single_value("SELECT COUNT(*) FROM services WHERE status = 'active'", &[]);
//! println!("active services: {:?}", active_services);
//! ```
//!
//! ## What this is not
//!
//! There is no SQL interpreter here. The engine supports exactly the access
//! patterns the application issues; the recognizer list in `dispatch` is a
//! closed surface, and extending it means adding a handler, not widening a
//! grammar. There are also no transactions and no cross-process
//! coordination: two overlapping writers to the same directory can lose
//! updates to each other.

pub mod db_error;
pub mod engine;
pub mod record;
pub mod statement;

mod dispatch;
mod handlers;
mod seed;
mod storage;
mod table;
mod test;

pub use crate::db_error::DbError;
pub use crate::engine::SimDb;
pub use crate::record::{Record, Value};
pub use crate::statement::Statement;
