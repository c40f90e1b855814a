use std::sync::PoisonError;
use thiserror::Error;

/// Error type for repository operations
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// SQLite error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Connection pool error
    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// The blocking task running the statement panicked or was cancelled
    #[error("Storage task failed: {0}")]
    Task(String),

    /// Lock error
    #[error("Lock error: {0}")]
    Lock(String),

    /// Storage cannot be reached
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// A stored value could not be interpreted
    #[error("Invalid stored data: {0}")]
    InvalidData(String),

    /// No record with the given id
    #[error("Record not found: {0}")]
    NotFound(i64),
}

impl<T> From<PoisonError<T>> for RepositoryError {
    fn from(error: PoisonError<T>) -> Self {
        RepositoryError::Lock(error.to_string())
    }
}
