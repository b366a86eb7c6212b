use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Storage fault raised while opening, reading or writing records.
#[derive(Debug)]
pub enum RepoError {
    Sqlite(rusqlite::Error),
    /// The database file was stamped by a build with a newer table layout.
    SchemaTooNew { found: u32, supported: u32 },
    InvalidData(String),
    /// A thread panicked while holding the storage lock.
    ConnectionPoisoned,
    /// A blocking storage task panicked or was cancelled.
    WorkerFailed(String),
    /// The record feed stopped publishing.
    FeedClosed,
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite: {err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "database layout {found} was written by a newer build (this build reads {supported})"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted record data: {message}"),
            Self::ConnectionPoisoned => write!(f, "storage lock poisoned"),
            Self::WorkerFailed(message) => write!(f, "storage worker failed: {message}"),
            Self::FeedClosed => write!(f, "record feed closed"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
