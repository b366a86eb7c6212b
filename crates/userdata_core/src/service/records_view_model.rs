//! View-state controller for the records and new-entry screens.
//!
//! # Responsibility
//! - Expose the record list as shared, continuously updated view-state.
//! - Own the entry form, validate it, and write valid entries.
//!
//! # Invariants
//! - Nothing reaches the repository unless all four fields validate.
//! - A rejected submit rewrites all four error slots and keeps the text.
//! - The write runs on the blocking pool, never on the caller's task.
//! - Storage faults are returned to the caller unchanged.

use crate::model::form::{FormField, FormState};
use crate::repo::{RecordRepository, RepoError, RepoResult};
use crate::service::records_feed::{FeedResult, RecordsFeed, RecordsObserver, RecordsState};
use log::{error, info};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;

/// How long the record feed outlives its last observer.
pub const DEFAULT_SHARE_GRACE_PERIOD: Duration = Duration::from_secs(5);

/// Controller behind the records list and the entry form.
pub struct RecordsViewModel<R: RecordRepository> {
    repo: Arc<R>,
    form: watch::Sender<FormState>,
    records: Arc<RecordsFeed>,
}

impl<R: RecordRepository> RecordsViewModel<R> {
    /// Creates a controller with [`DEFAULT_SHARE_GRACE_PERIOD`].
    ///
    /// # Panics
    /// Panics when called outside a Tokio runtime.
    pub fn new(repo: R) -> Self {
        Self::with_grace_period(repo, DEFAULT_SHARE_GRACE_PERIOD)
    }

    /// Creates a controller whose record feed stops `grace_period` after
    /// the last observer detaches.
    ///
    /// # Panics
    /// Panics when called outside a Tokio runtime.
    pub fn with_grace_period(repo: R, grace_period: Duration) -> Self {
        let repo = Arc::new(repo);
        let feed_repo = Arc::clone(&repo);
        let records = RecordsFeed::new(
            move || feed_repo.all_records(),
            grace_period,
            Handle::current(),
        );
        let (form, _) = watch::channel(FormState::default());

        Self {
            repo,
            form,
            records: Arc::new(records),
        }
    }

    /// Observes the record list. Starts the feed if it is not running.
    pub fn records_state(&self) -> RecordsObserver {
        self.records.attach()
    }

    /// Latest record-list state without attaching an observer.
    pub fn records_snapshot(&self) -> FeedResult<RecordsState> {
        self.records.current()
    }

    /// Whether the upstream store subscription is currently running.
    pub fn is_records_feed_active(&self) -> bool {
        self.records.is_active()
    }

    pub fn form_state(&self) -> watch::Receiver<FormState> {
        self.form.subscribe()
    }

    pub fn form_snapshot(&self) -> FormState {
        self.form.borrow().clone()
    }

    /// Sets one field's text and recomputes only that field's error.
    pub fn update_field(&self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        self.form.send_if_modified(|form| {
            let mut next = form.clone();
            next.set_field(field, value);
            if *form == next {
                return false;
            }
            *form = next;
            true
        });
    }

    pub fn update_name(&self, name: impl Into<String>) {
        self.update_field(FormField::Name, name);
    }

    pub fn update_age(&self, age: impl Into<String>) {
        self.update_field(FormField::Age, age);
    }

    pub fn update_dob(&self, dob: impl Into<String>) {
        self.update_field(FormField::Dob, dob);
    }

    pub fn update_address(&self, address: impl Into<String>) {
        self.update_field(FormField::Address, address);
    }

    /// Validates the whole form and appends one record when it is valid.
    ///
    /// A rejected form is not an error: the outcome is visible through
    /// [`form_state`](Self::form_state). Only storage faults return `Err`.
    pub async fn submit(&self) -> RepoResult<()> {
        let form = self.form_snapshot();

        let Some(record) = form.to_new_record() else {
            let errors = form.validate();
            let invalid_fields = errors.invalid_count();
            self.form.send_if_modified(|form| {
                let before = form.clone();
                form.apply_errors(errors);
                *form != before
            });
            info!("event=form_submit module=service status=rejected invalid_fields={invalid_fields}");
            return Ok(());
        };

        let repo = Arc::clone(&self.repo);
        let written = tokio::task::spawn_blocking(move || repo.add_record(&record))
            .await
            .map_err(|err| RepoError::WorkerFailed(err.to_string()))
            .and_then(|result| result);

        match written {
            Ok(id) => {
                info!("event=form_submit module=service status=ok id={id}");
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=form_submit module=service status=error error_code=append_failed error={err}"
                );
                Err(err)
            }
        }
    }
}

impl<R: RecordRepository> Drop for RecordsViewModel<R> {
    fn drop(&mut self) {
        self.records.shutdown();
    }
}
