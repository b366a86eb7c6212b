//! Process-local record store.
//!
//! Keeps rows in a `Vec` behind a lock. Used as a substitute for the
//! SQLite store in tests and previews.

use super::{RecordStore, RecordSubscription};
use crate::model::record::{NewRecord, Record, RecordId};
use crate::repo::{RepoError, RepoResult};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::watch;

#[derive(Default)]
struct Table {
    rows: Vec<Record>,
    last_id: RecordId,
}

/// In-memory record store with the same id and change semantics as SQLite.
#[derive(Clone)]
pub struct InMemoryRecordStore {
    table: Arc<RwLock<Table>>,
    changes: Arc<watch::Sender<u64>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            table: Arc::new(RwLock::new(Table::default())),
            changes: Arc::new(changes),
        }
    }

    /// Row count. A poisoned lock still reports the rows it holds.
    pub fn len(&self) -> usize {
        self.table
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .rows
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of live subscriptions.
    pub fn active_subscriptions(&self) -> usize {
        self.changes.receiver_count()
    }
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for InMemoryRecordStore {
    fn append(&self, record: &NewRecord) -> RepoResult<RecordId> {
        let id = {
            let mut table = self
                .table
                .write()
                .map_err(|_| RepoError::ConnectionPoisoned)?;
            table.last_id += 1;
            let id = table.last_id;
            table.rows.push(record.clone().into_record(id));
            id
        };

        self.changes
            .send_modify(|version| *version = version.wrapping_add(1));
        Ok(id)
    }

    fn observe_all(&self) -> RecordSubscription {
        let table = Arc::clone(&self.table);
        RecordSubscription::new(self.changes.subscribe(), move || {
            table
                .read()
                .map(|table| table.rows.clone())
                .map_err(|_| RepoError::ConnectionPoisoned)
        })
    }
}
