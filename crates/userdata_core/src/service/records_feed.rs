//! Shared record-list feed with delayed teardown.
//!
//! # Responsibility
//! - Run one upstream store subscription for any number of observers.
//! - Map every store snapshot to a [`RecordsState`].
//!
//! # Invariants
//! - At most one upstream task runs per feed.
//! - The upstream stops only after the last observer has been gone for
//!   the full grace period; a new observer inside that window keeps it.
//! - The last published state survives a teardown, so `Loading` is only
//!   ever seen before the first snapshot.
//! - A failed snapshot is published to every observer and ends the run;
//!   it stays visible until a later run publishes a fresh snapshot.

use crate::model::record::{Record, RecordItem};
use crate::model::ui_state::UiState;
use crate::repo::RepoError;
use crate::store::RecordSubscription;
use log::{error, info};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// View-state of the records screen.
pub type RecordsState = UiState<Vec<RecordItem>>;

/// Outcome published on the feed: the view-state or the storage fault
/// that stopped it.
pub type FeedResult<T> = Result<T, Arc<RepoError>>;

type Published = FeedResult<RecordsState>;

type Subscribe = Box<dyn Fn() -> RecordSubscription + Send + Sync>;

/// Maps one store snapshot to list view-state, newest id first.
pub fn records_view_state(mut records: Vec<Record>) -> RecordsState {
    if records.is_empty() {
        return UiState::Empty;
    }
    records.sort_unstable_by(|left, right| right.id.cmp(&left.id));
    UiState::Success(records.into_iter().map(RecordItem::from).collect())
}

#[derive(Default)]
struct Sharing {
    observers: usize,
    /// Bumped on every attach and on every drop to zero observers, so a
    /// stale teardown timer can tell it was superseded.
    generation: u64,
    upstream: Option<JoinHandle<()>>,
    teardown: Option<JoinHandle<()>>,
}

pub(crate) struct RecordsFeed {
    state: Arc<watch::Sender<Published>>,
    subscribe: Subscribe,
    grace_period: Duration,
    runtime: Handle,
    sharing: Mutex<Sharing>,
}

impl RecordsFeed {
    pub(crate) fn new(
        subscribe: impl Fn() -> RecordSubscription + Send + Sync + 'static,
        grace_period: Duration,
        runtime: Handle,
    ) -> Self {
        let (state, _) = watch::channel(Ok(UiState::Loading));
        Self {
            state: Arc::new(state),
            subscribe: Box::new(subscribe),
            grace_period,
            runtime,
            sharing: Mutex::new(Sharing::default()),
        }
    }

    pub(crate) fn attach(self: &Arc<Self>) -> RecordsObserver {
        let receiver = self.state.subscribe();
        let mut sharing = self.lock_sharing();
        sharing.observers += 1;
        sharing.generation = sharing.generation.wrapping_add(1);
        if let Some(teardown) = sharing.teardown.take() {
            teardown.abort();
        }

        let running = sharing
            .upstream
            .as_ref()
            .is_some_and(|upstream| !upstream.is_finished());
        if !running {
            let subscription = (self.subscribe)();
            let state = Arc::clone(&self.state);
            sharing.upstream = Some(self.runtime.spawn(run_upstream(subscription, state)));
        }
        drop(sharing);

        RecordsObserver {
            receiver,
            feed: Arc::clone(self),
        }
    }

    fn detach(self: &Arc<Self>) {
        let mut sharing = self.lock_sharing();
        sharing.observers = sharing.observers.saturating_sub(1);
        if sharing.observers > 0 {
            return;
        }

        sharing.generation = sharing.generation.wrapping_add(1);
        let generation = sharing.generation;
        let grace_period = self.grace_period;
        let feed = Arc::downgrade(self);
        let teardown = self.runtime.spawn(async move {
            tokio::time::sleep(grace_period).await;
            teardown_if_idle(feed, generation);
        });
        if let Some(stale) = sharing.teardown.replace(teardown) {
            stale.abort();
        }
    }

    pub(crate) fn is_active(&self) -> bool {
        self.lock_sharing()
            .upstream
            .as_ref()
            .is_some_and(|upstream| !upstream.is_finished())
    }

    pub(crate) fn current(&self) -> FeedResult<RecordsState> {
        self.state.borrow().clone()
    }

    pub(crate) fn shutdown(&self) {
        let mut sharing = self.lock_sharing();
        if let Some(teardown) = sharing.teardown.take() {
            teardown.abort();
        }
        if let Some(upstream) = sharing.upstream.take() {
            upstream.abort();
        }
    }

    fn lock_sharing(&self) -> MutexGuard<'_, Sharing> {
        // Sharing stays consistent under poisoning: counters and handles only.
        self.sharing.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn teardown_if_idle(feed: Weak<RecordsFeed>, generation: u64) {
    let Some(feed) = feed.upgrade() else {
        return;
    };
    let mut sharing = feed.lock_sharing();
    if sharing.observers > 0 || sharing.generation != generation {
        return;
    }
    sharing.teardown = None;
    if let Some(upstream) = sharing.upstream.take() {
        upstream.abort();
        info!("event=records_feed module=service status=stop reason=idle");
    }
}

async fn run_upstream(
    mut subscription: RecordSubscription,
    state: Arc<watch::Sender<Published>>,
) {
    info!("event=records_feed module=service status=start");
    while let Some(snapshot) = subscription.next().await {
        match snapshot {
            Ok(records) => {
                let next = records_view_state(records);
                state.send_if_modified(|current| {
                    if matches!(current, Ok(shown) if *shown == next) {
                        return false;
                    }
                    *current = Ok(next);
                    true
                });
            }
            Err(err) => {
                error!(
                    "event=records_feed module=service status=error error_code=snapshot_failed error={err}"
                );
                state.send_replace(Err(Arc::new(err)));
                return;
            }
        }
    }
    info!("event=records_feed module=service status=stop reason=store_closed");
    state.send_replace(Err(Arc::new(RepoError::FeedClosed)));
}

/// Live handle on the records view-state.
///
/// Holding one keeps the upstream feed running. Dropping the last one
/// starts the teardown grace period. Every read returns `Err` once a
/// storage fault has stopped the feed.
pub struct RecordsObserver {
    receiver: watch::Receiver<Published>,
    feed: Arc<RecordsFeed>,
}

impl RecordsObserver {
    /// Latest published state.
    pub fn current(&self) -> FeedResult<RecordsState> {
        self.receiver.borrow().clone()
    }

    /// Waits for the next distinct state and returns it.
    pub async fn changed(&mut self) -> FeedResult<RecordsState> {
        if self.receiver.changed().await.is_err() {
            return Err(Arc::new(RepoError::FeedClosed));
        }
        self.receiver.borrow_and_update().clone()
    }

    /// Returns the first state (current included) that satisfies
    /// `predicate`, or the fault that stopped the feed first.
    pub async fn wait_for(
        &mut self,
        mut predicate: impl FnMut(&RecordsState) -> bool,
    ) -> FeedResult<RecordsState> {
        let published = self
            .receiver
            .wait_for(|published| match published {
                Ok(state) => predicate(state),
                Err(_) => true,
            })
            .await;
        match published {
            Ok(published) => published.clone(),
            Err(_) => Err(Arc::new(RepoError::FeedClosed)),
        }
    }

    /// Returns the first state that is not `Loading`.
    pub async fn loaded(&mut self) -> FeedResult<RecordsState> {
        self.wait_for(|state| !state.is_loading()).await
    }
}

impl Drop for RecordsObserver {
    fn drop(&mut self) {
        self.feed.detach();
    }
}
