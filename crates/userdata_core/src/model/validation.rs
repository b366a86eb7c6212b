//! Pure single-field validators for the entry form.
//!
//! # Invariants
//! - Each validator depends only on its own field text.
//! - "Empty" means blank: no characters, or only whitespace. Whitespace is
//!   Unicode `White_Space` without U+0085, plus the separators U+001C..U+001F.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Validation failure for one form field.
///
/// `Display` yields the exact message shown next to the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldError {
    NameEmpty,
    AgeNotANumber,
    AgeNegative,
    DobEmpty,
    AddressEmpty,
}

impl FieldError {
    pub fn message(self) -> &'static str {
        match self {
            Self::NameEmpty => "Name cannot be empty",
            Self::AgeNotANumber => "Age must be a number",
            Self::AgeNegative => "Age cannot be negative",
            Self::DobEmpty => "DOB cannot be empty",
            Self::AddressEmpty => "Address cannot be empty",
        }
    }
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl Error for FieldError {}

pub fn validate_name(name: &str) -> Option<FieldError> {
    is_blank(name).then_some(FieldError::NameEmpty)
}

/// Accepts any text that parses as a non-negative 32-bit integer.
///
/// Surrounding whitespace is not tolerated: `" 30"` is not a number.
pub fn validate_age(age: &str) -> Option<FieldError> {
    match parse_age(age) {
        None => Some(FieldError::AgeNotANumber),
        Some(value) if value < 0 => Some(FieldError::AgeNegative),
        Some(_) => None,
    }
}

pub fn validate_dob(dob: &str) -> Option<FieldError> {
    is_blank(dob).then_some(FieldError::DobEmpty)
}

pub fn validate_address(address: &str) -> Option<FieldError> {
    is_blank(address).then_some(FieldError::AddressEmpty)
}

fn is_blank(text: &str) -> bool {
    text.chars().all(is_blank_char)
}

fn is_blank_char(c: char) -> bool {
    matches!(c, '\u{1c}'..='\u{1f}') || (c.is_whitespace() && c != '\u{85}')
}

pub(crate) fn parse_age(age: &str) -> Option<i32> {
    age.parse::<i32>().ok()
}
