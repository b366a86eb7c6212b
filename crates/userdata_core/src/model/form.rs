//! Transient entry-form state.
//!
//! # Responsibility
//! - Mirror the four editable fields as raw text.
//! - Carry the latest validation outcome per field.
//!
//! # Invariants
//! - Editing one field recomputes only that field's error.
//! - Raw text is kept exactly as typed; whitespace only matters to validation.

use crate::model::record::NewRecord;
use crate::model::validation::{
    parse_age, validate_address, validate_age, validate_dob, validate_name, FieldError,
};
use serde::{Deserialize, Serialize};

/// Editable field of the entry form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Name,
    Age,
    Dob,
    Address,
}

impl FormField {
    pub const ALL: [FormField; 4] = [Self::Name, Self::Age, Self::Dob, Self::Address];

    /// Runs the validator that owns this field.
    pub fn validate(self, text: &str) -> Option<FieldError> {
        match self {
            Self::Name => validate_name(text),
            Self::Age => validate_age(text),
            Self::Dob => validate_dob(text),
            Self::Address => validate_address(text),
        }
    }
}

/// Validator outputs for all four fields at one point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormErrors {
    pub name: Option<FieldError>,
    pub age: Option<FieldError>,
    pub dob: Option<FieldError>,
    pub address: Option<FieldError>,
}

impl FormErrors {
    pub fn get(&self, field: FormField) -> Option<FieldError> {
        match field {
            FormField::Name => self.name,
            FormField::Age => self.age,
            FormField::Dob => self.dob,
            FormField::Address => self.address,
        }
    }

    pub fn invalid_count(&self) -> usize {
        FormField::ALL
            .iter()
            .filter(|field| self.get(**field).is_some())
            .count()
    }

    pub fn is_clean(&self) -> bool {
        self.invalid_count() == 0
    }
}

/// Entry form text plus per-field errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormState {
    pub name: String,
    pub name_error: Option<FieldError>,
    pub age: String,
    pub age_error: Option<FieldError>,
    pub dob: String,
    pub dob_error: Option<FieldError>,
    pub address: String,
    pub address_error: Option<FieldError>,
}

impl FormState {
    pub fn text(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Age => &self.age,
            FormField::Dob => &self.dob,
            FormField::Address => &self.address,
        }
    }

    pub fn error(&self, field: FormField) -> Option<FieldError> {
        match field {
            FormField::Name => self.name_error,
            FormField::Age => self.age_error,
            FormField::Dob => self.dob_error,
            FormField::Address => self.address_error,
        }
    }

    /// Replaces one field's text and recomputes that field's error.
    pub fn set_field(&mut self, field: FormField, value: String) {
        let error = field.validate(&value);
        let (text, slot) = match field {
            FormField::Name => (&mut self.name, &mut self.name_error),
            FormField::Age => (&mut self.age, &mut self.age_error),
            FormField::Dob => (&mut self.dob, &mut self.dob_error),
            FormField::Address => (&mut self.address, &mut self.address_error),
        };
        *text = value;
        *slot = error;
    }

    /// Validates every field against its current text.
    pub fn validate(&self) -> FormErrors {
        FormErrors {
            name: validate_name(&self.name),
            age: validate_age(&self.age),
            dob: validate_dob(&self.dob),
            address: validate_address(&self.address),
        }
    }

    /// Overwrites all four error slots, including the ones that are now clear.
    pub fn apply_errors(&mut self, errors: FormErrors) {
        self.name_error = errors.name;
        self.age_error = errors.age;
        self.dob_error = errors.dob;
        self.address_error = errors.address;
    }

    pub fn has_errors(&self) -> bool {
        FormField::ALL
            .iter()
            .any(|field| self.error(*field).is_some())
    }

    /// Builds the insert payload when every field validates.
    ///
    /// Text is carried over untrimmed.
    pub fn to_new_record(&self) -> Option<NewRecord> {
        if !self.validate().is_clean() {
            return None;
        }
        Some(NewRecord {
            name: self.name.clone(),
            age: parse_age(&self.age)?,
            date_of_birth: self.dob.clone(),
            address: self.address.clone(),
        })
    }
}
