//! Record entity and its list-row projection.

use serde::{Deserialize, Serialize};

/// Store-assigned surrogate key. Monotonically increasing per table.
pub type RecordId = i64;

/// One persisted user entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub name: String,
    pub age: i32,
    /// Free-form text, e.g. `1/1/1994`. No calendar validation is applied.
    pub date_of_birth: String,
    pub address: String,
}

/// Insert payload for the store. The id is assigned on append.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecord {
    pub name: String,
    pub age: i32,
    pub date_of_birth: String,
    pub address: String,
}

impl NewRecord {
    /// Attaches the id assigned by the store.
    pub fn into_record(self, id: RecordId) -> Record {
        Record {
            id,
            name: self.name,
            age: self.age,
            date_of_birth: self.date_of_birth,
            address: self.address,
        }
    }
}

/// Read-only row rendered by the records screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordItem {
    pub id: RecordId,
    pub name: String,
    pub age: i32,
    pub date_of_birth: String,
    pub address: String,
}

impl RecordItem {
    /// Card lines in display order: name, age, date of birth, address.
    pub fn display_lines(&self) -> [String; 4] {
        [
            self.name.clone(),
            format!("Age: {}", self.age),
            format!("Date of birth: {}", self.date_of_birth),
            format!("Address: {}", self.address),
        ]
    }
}

impl From<Record> for RecordItem {
    fn from(record: Record) -> Self {
        Self {
            id: record.id,
            name: record.name,
            age: record.age,
            date_of_birth: record.date_of_birth,
            address: record.address,
        }
    }
}
