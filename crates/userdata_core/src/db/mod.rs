//! SQLite bootstrap for the single `user_data` table.
//!
//! # Invariants
//! - A returned connection always has the `user_data` table.
//! - `PRAGMA user_version` is written once on creation and only read
//!   afterwards, as a guard against files from a newer build.

mod open;
mod schema;

pub use open::{open_db, open_db_in_memory};
pub use schema::SCHEMA_VERSION;
