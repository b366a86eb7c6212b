//! Core logic for the user data recorder.
//! Owns the record store, the repository seam and the view-state controller.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::form::{FormErrors, FormField, FormState};
pub use model::record::{NewRecord, Record, RecordId, RecordItem};
pub use model::ui_state::UiState;
pub use model::validation::{
    validate_address, validate_age, validate_dob, validate_name, FieldError,
};
pub use repo::{RecordRepository, RepoError, RepoResult, StoreRecordRepository};
pub use service::records_feed::{records_view_state, FeedResult, RecordsObserver, RecordsState};
pub use service::records_view_model::{RecordsViewModel, DEFAULT_SHARE_GRACE_PERIOD};
pub use store::{InMemoryRecordStore, RecordStore, RecordSubscription, SqliteRecordStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
