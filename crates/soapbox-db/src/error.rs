use thiserror::Error;

/// Errors produced by the store layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A UNIQUE or PRIMARY KEY constraint rejected a write.
    #[error("Record already exists")]
    Duplicate,

    /// A query expected a matching row but found none.
    #[error("Record not found")]
    NotFound,

    /// Any other SQLite error.
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The connection mutex was poisoned by a panicking holder.
    #[error("DB lock poisoned: {0}")]
    Poisoned(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;
