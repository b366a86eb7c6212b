//! Domain model for user data entries.
//!
//! # Responsibility
//! - Define the persisted record shape and its UI-ready projection.
//! - Define transient form state and the pure field validators.
//!
//! # Invariants
//! - Every persisted `Record` passed all four field validators first.
//! - A `RecordId` is assigned by the store and never reused.

pub mod form;
pub mod record;
pub mod ui_state;
pub mod validation;
