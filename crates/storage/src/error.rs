use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Unknown entity: {0}")]
    UnknownEntity(String),

    #[error("Unknown table: {0}")]
    UnknownTable(String),

    #[error("Row in table '{table}' has no value for key column '{column}'")]
    MissingKey { table: String, column: String },

    #[error("Unsupported key value for ordering: {0}")]
    UnsupportedKey(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}
