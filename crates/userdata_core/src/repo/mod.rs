//! Repository layer between the controller and the record store.
//!
//! # Responsibility
//! - Give the controller a storage-agnostic contract.
//! - Provide the substitution seam used by tests.
//!
//! # Invariants
//! - Repository implementations add no logic, caching or retries.

mod error;
pub mod record_repo;

pub use error::{RepoError, RepoResult};
pub use record_repo::{RecordRepository, StoreRecordRepository};
