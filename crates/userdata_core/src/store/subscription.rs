//! Replaying change subscription shared by all store implementations.

use crate::model::record::Record;
use crate::repo::{RepoError, RepoResult};
use std::sync::Arc;
use tokio::sync::watch;

type Snapshot = Arc<dyn Fn() -> RepoResult<Vec<Record>> + Send + Sync>;

/// Push-based stream of full record sets.
///
/// The first [`next`](Self::next) call yields the current contents right
/// away. Later calls wait until the store publishes a change. Several
/// changes landing between two calls coalesce into one snapshot.
pub struct RecordSubscription {
    snapshot: Snapshot,
    changes: watch::Receiver<u64>,
    replayed: bool,
}

impl RecordSubscription {
    /// Builds a subscription from a change-version receiver and a table read.
    ///
    /// `snapshot` runs on Tokio's blocking pool.
    pub fn new(
        changes: watch::Receiver<u64>,
        snapshot: impl Fn() -> RepoResult<Vec<Record>> + Send + Sync + 'static,
    ) -> Self {
        Self {
            snapshot: Arc::new(snapshot),
            changes,
            replayed: false,
        }
    }

    /// Waits for the next full record set.
    ///
    /// Returns `None` once the store has been dropped.
    pub async fn next(&mut self) -> Option<RepoResult<Vec<Record>>> {
        if self.replayed {
            self.changes.changed().await.ok()?;
        }
        self.replayed = true;

        // Mark the version seen before reading so a concurrent append
        // triggers one more snapshot instead of being lost.
        let _ = self.changes.borrow_and_update();

        let snapshot = Arc::clone(&self.snapshot);
        let result = match tokio::task::spawn_blocking(move || snapshot()).await {
            Ok(result) => result,
            Err(err) => Err(RepoError::WorkerFailed(err.to_string())),
        };
        Some(result)
    }
}
