// Error types for storage operations

use thiserror::Error;

/// Failures raised by a transaction store binding
#[derive(Debug, Error)]
pub enum StorageError {
    /// Error occurred during database connection attempt
    #[error("Database connection error: {0}")]
    ConnectionError(String),

    /// Error occurred during a read or write
    #[error("Database query error: {0}")]
    QueryError(String),
}

impl From<sea_orm::DbErr> for StorageError {
    fn from(err: sea_orm::DbErr) -> Self {
        StorageError::QueryError(err.to_string())
    }
}
