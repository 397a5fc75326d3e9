use engine_core::error::OpError;
use engine_runtime::error::BatchError;
use storage::error::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to read the dataset file: {0}")]
    DatasetRead(#[from] std::io::Error),

    #[error("Failed to parse the dataset file as JSON: {0}")]
    DatasetParse(#[from] serde_json::Error),

    #[error("Failed to run the batch: {0}")]
    Batch(#[from] BatchError),

    #[error("Row operation failed: {0}")]
    Op(#[from] OpError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Invalid filter '{0}', expected field=value")]
    InvalidFilter(String),

    #[error("Invalid timestamp '{0}', expected RFC 3339")]
    InvalidTimestamp(String),
}
