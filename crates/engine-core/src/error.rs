use storage::error::StorageError;
use thiserror::Error;

/// Configuration problems detected at `run()` entry, before any row is
/// touched. Always fatal to the run.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unable to run batch as source entity '{0}' is not registered")]
    UnknownEntity(String),

    #[error("Unable to copy as destination entity '{0}' is not registered")]
    UnknownDestination(String),

    #[error("Unable to run batch as page size must be greater than 1. Size: {0}")]
    InvalidPageSize(i64),

    #[error("Unable to run batch as limit must be greater than or equal to 0. Size: {0}")]
    InvalidLimit(i64),

    #[error("Unable to run batch as rate per minute must be greater than 0. Rate: {0}")]
    InvalidRate(i64),

    #[error("Unable to dispatch rows as jobs without a job queue")]
    QueueRequired,
}

/// Failures of a single row operation. Validation errors mean the operation
/// could not run; verification errors mean a write did not take effect and
/// must never be swallowed.
#[derive(Error, Debug)]
pub enum OpError {
    #[error("Unable to copy row as destination entity '{0}' is not registered")]
    UnknownDestination(String),

    #[error("Unable to copy row as it no longer exists: {row}")]
    SourceRowMissing { row: String },

    #[error(
        "Unable to copy row {row} as destination table '{table}' is missing columns: {}",
        .columns.join(", ")
    )]
    MissingColumns {
        row: String,
        table: String,
        columns: Vec<String>,
    },

    #[error("Row copy failed: destination row {row} not found after write")]
    CopyNotConfirmed { row: String },

    #[error("Row deletion failed: row {row} still present after delete")]
    DeleteNotConfirmed { row: String },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Error, Debug)]
pub enum QueueError {
    #[error("Failed to enqueue job: {0}")]
    Enqueue(String),
}
