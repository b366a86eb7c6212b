//! Record repository contract and its store-backed implementation.

use crate::model::record::{NewRecord, RecordId};
use crate::repo::RepoResult;
use crate::store::{RecordStore, RecordSubscription};

/// Data access used by the view-state controller.
pub trait RecordRepository: Send + Sync + 'static {
    fn add_record(&self, record: &NewRecord) -> RepoResult<RecordId>;
    fn all_records(&self) -> RecordSubscription;
}

/// Pass-through repository over any [`RecordStore`].
pub struct StoreRecordRepository<S: RecordStore> {
    store: S,
}

impl<S: RecordStore> StoreRecordRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: RecordStore> RecordRepository for StoreRecordRepository<S> {
    fn add_record(&self, record: &NewRecord) -> RepoResult<RecordId> {
        self.store.append(record)
    }

    fn all_records(&self) -> RecordSubscription {
        self.store.observe_all()
    }
}
