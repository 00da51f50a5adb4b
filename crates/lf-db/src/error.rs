//! Error types for lf-db

use thiserror::Error;

/// Storage errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Query execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Transaction management error (D003)
    #[error("[D003] Transaction failed: {0}")]
    TransactionError(String),

    /// A stored row could not be turned back into a record or policy (D004)
    #[error("[D004] Invalid stored row: {0}")]
    InvalidRow(String),

    /// Write rejected because it would break record uniqueness, or targets a
    /// record that is missing or changed since it was read (D005)
    #[error("[D005] Conflicting attendance write: {0}")]
    Conflict(String),

    /// Mutex poisoned (D006)
    #[error("[D006] Database mutex poisoned: {0}")]
    MutexPoisoned(String),

    /// Internal error (D007)
    #[error("[D007] Internal database error: {0}")]
    Internal(String),

    /// CSV loading error (D008)
    #[error("[D008] CSV load failed: {0}")]
    CsvError(String),

    /// Schema migration failed (D009)
    #[error("[D009] Database migration failed: {0}")]
    MigrationError(String),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        DbError::ExecutionError(err.to_string())
    }
}
