//! Controller layer consumed by presentation code.
//!
//! # Responsibility
//! - Turn store emissions into screen-ready view-state.
//! - Own the entry form and gate writes behind validation.

pub mod records_feed;
pub mod records_view_model;
