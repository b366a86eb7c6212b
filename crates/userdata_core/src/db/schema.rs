use crate::repo::{RepoError, RepoResult};
use rusqlite::Connection;

/// Layout stamp written to `PRAGMA user_version` when the table is created.
pub const SCHEMA_VERSION: u32 = 1;

const CREATE_SQL: &str = include_str!("schema.sql");

/// Creates the table on a fresh file and refuses files stamped by a newer
/// build. An already stamped file is left untouched.
pub(super) fn ensure_schema(conn: &mut Connection) -> RepoResult<()> {
    let found: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;

    match found {
        0 => {
            let tx = conn.transaction()?;
            tx.execute_batch(CREATE_SQL)?;
            tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
            tx.commit()?;
            Ok(())
        }
        SCHEMA_VERSION => Ok(()),
        found => Err(RepoError::SchemaTooNew {
            found,
            supported: SCHEMA_VERSION,
        }),
    }
}
