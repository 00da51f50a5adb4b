//! Error types for lf-engine

use lf_core::CoreError;
use lf_db::DbError;
use thiserror::Error;

/// Engine error type
#[derive(Error, Debug)]
pub enum EngineError {
    /// Invalid input or policy, from lf-core
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Storage failure, from lf-db
    #[error(transparent)]
    Db(#[from] DbError),

    /// R001: A background reprocess task panicked or was aborted
    #[error("[R001] Reprocess task failed: {0}")]
    TaskJoin(String),
}

/// Result type alias for EngineError
pub type EngineResult<T> = Result<T, EngineError>;
