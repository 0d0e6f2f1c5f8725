use mentorlink_shared::error::DomainError;
use thiserror::Error;

/// Errors produced by the store layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite error.
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Failed to determine a platform data directory.
    #[error("Could not determine application data directory")]
    NoDataDir,

    /// Generic I/O error (e.g. creating the database directory).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The referenced document does not exist.
    #[error("{collection}/{id} not found")]
    NotFound { collection: String, id: String },

    /// A conditional update found the document changed since it was read.
    #[error("Conflict on {field}: expected {expected} entries, found {actual}")]
    Conflict {
        field: String,
        expected: usize,
        actual: usize,
    },

    /// Input rejected before touching the database.
    #[error(transparent)]
    Invalid(#[from] DomainError),

    /// Migration failure.
    #[error("Migration error: {0}")]
    Migration(String),

    /// Document body (de)serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    pub fn not_found(collection: &str, id: &str) -> Self {
        Self::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;
