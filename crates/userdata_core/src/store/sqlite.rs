//! SQLite-backed record store.
//!
//! # Invariants
//! - The wrapped connection came from `open_db` or `open_db_in_memory`.
//! - The change version is bumped only after an insert commits.

use super::{RecordStore, RecordSubscription};
use crate::db::{open_db, open_db_in_memory};
use crate::model::record::{NewRecord, Record, RecordId};
use crate::repo::{RepoError, RepoResult};
use log::{debug, error};
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

const RECORD_SELECT_SQL: &str = "SELECT
    id,
    name,
    age,
    date_of_birth,
    address
FROM user_data";

/// Record store over one `user_data` table.
///
/// Cloning is cheap; clones share the connection and change feed.
#[derive(Clone)]
pub struct SqliteRecordStore {
    conn: Arc<Mutex<Connection>>,
    changes: Arc<watch::Sender<u64>>,
}

impl SqliteRecordStore {
    /// Wraps a connection returned by [`open_db`] or [`open_db_in_memory`].
    pub fn new(conn: Connection) -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            conn: Arc::new(Mutex::new(conn)),
            changes: Arc::new(changes),
        }
    }

    /// Opens (or creates) the database file and migrates it.
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> RepoResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    /// Reads every stored record in storage order.
    pub fn load_all(&self) -> RepoResult<Vec<Record>> {
        load_all(&self.conn)
    }

    /// Number of live subscriptions.
    pub fn active_subscriptions(&self) -> usize {
        self.changes.receiver_count()
    }
}

impl RecordStore for SqliteRecordStore {
    fn append(&self, record: &NewRecord) -> RepoResult<RecordId> {
        let id = {
            let conn = self.conn.lock().map_err(|_| RepoError::ConnectionPoisoned)?;
            let inserted = conn.execute(
                "INSERT INTO user_data (
                    name,
                    age,
                    date_of_birth,
                    address
                ) VALUES (?1, ?2, ?3, ?4);",
                params![
                    record.name.as_str(),
                    record.age,
                    record.date_of_birth.as_str(),
                    record.address.as_str(),
                ],
            );
            if let Err(err) = inserted {
                error!(
                    "event=record_append module=store status=error error_code=insert_failed error={err}"
                );
                return Err(err.into());
            }
            conn.last_insert_rowid()
        };

        self.changes
            .send_modify(|version| *version = version.wrapping_add(1));
        debug!("event=record_append module=store status=ok id={id}");
        Ok(id)
    }

    fn observe_all(&self) -> RecordSubscription {
        let conn = Arc::clone(&self.conn);
        RecordSubscription::new(self.changes.subscribe(), move || load_all(&conn))
    }
}

fn load_all(conn: &Mutex<Connection>) -> RepoResult<Vec<Record>> {
    let conn = conn.lock().map_err(|_| RepoError::ConnectionPoisoned)?;
    let mut stmt = conn.prepare(&format!("{RECORD_SELECT_SQL};"))?;
    let mut rows = stmt.query([])?;
    let mut records = Vec::new();

    while let Some(row) = rows.next()? {
        records.push(parse_record_row(row)?);
    }

    Ok(records)
}

fn parse_record_row(row: &Row<'_>) -> RepoResult<Record> {
    let id: RecordId = row.get("id")?;
    let raw_age: i64 = row.get("age")?;
    let age = i32::try_from(raw_age).map_err(|_| {
        RepoError::InvalidData(format!("age `{raw_age}` out of range in user_data.age (id {id})"))
    })?;

    Ok(Record {
        id,
        name: row.get("name")?,
        age,
        date_of_birth: row.get("date_of_birth")?,
        address: row.get("address")?,
    })
}

#[cfg(test)]
mod tests {
    use super::SqliteRecordStore;
    use crate::model::record::NewRecord;
    use crate::repo::RepoError;
    use crate::store::RecordStore;

    fn entry(name: &str) -> NewRecord {
        NewRecord {
            name: name.to_string(),
            age: 1,
            date_of_birth: "d".to_string(),
            address: "a".to_string(),
        }
    }

    #[test]
    fn append_assigns_increasing_ids() {
        let store = SqliteRecordStore::open_in_memory().unwrap();

        let first = store.append(&entry("a")).unwrap();
        let second = store.append(&entry("b")).unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 2);
        assert_eq!(store.load_all().unwrap().len(), 2);
    }

    #[test]
    fn out_of_range_age_is_reported_as_invalid_data() {
        let store = SqliteRecordStore::open_in_memory().unwrap();
        store
            .conn
            .lock()
            .unwrap()
            .execute(
                "INSERT INTO user_data (name, age, date_of_birth, address)
                 VALUES ('x', 9999999999, 'd', 'a');",
                [],
            )
            .unwrap();

        let err = store.load_all().unwrap_err();
        assert!(matches!(err, RepoError::InvalidData(_)));
    }
}
