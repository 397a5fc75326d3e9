use engine_core::error::{ConfigError, OpError, QueueError};
use storage::error::StorageError;
use thiserror::Error;

/// Top-level errors for a batch run.
#[derive(Error, Debug)]
pub enum BatchError {
    /// Rejected configuration; raised before any row is touched.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A synchronous row operation failed fatally, aborting the run.
    #[error("Row operation failed: {0}")]
    Op(#[from] OpError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Queue error: {0}")]
    Queue(#[from] QueueError),
}
