//! Record store contracts and implementations.
//!
//! # Responsibility
//! - Persist records and assign their ids.
//! - Push the full record set to subscribers on every change.
//!
//! # Invariants
//! - Stores never validate field content; callers validate first.
//! - A subscription replays current contents before waiting for changes.
//! - No ordering is promised for emitted records.

mod in_memory;
mod sqlite;
mod subscription;

pub use in_memory::InMemoryRecordStore;
pub use sqlite::SqliteRecordStore;
pub use subscription::RecordSubscription;

use crate::model::record::{NewRecord, RecordId};
use crate::repo::RepoResult;

/// Single-table persistent record storage.
pub trait RecordStore: Send + Sync + 'static {
    /// Inserts a record and returns the id assigned to it.
    fn append(&self, record: &NewRecord) -> RepoResult<RecordId>;

    /// Subscribes to the full record set.
    fn observe_all(&self) -> RecordSubscription;
}
