use crate::core::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A lazy, serializable reference to a single row: entity name plus primary
/// key, never the hydrated row itself. A unit of work built from a `RowRef`
/// can be queued, delayed arbitrarily and still observe the row's state at
/// actual execution time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RowRef {
    pub entity: String,
    pub key: Value,
}

impl RowRef {
    pub fn new(entity: &str, key: Value) -> Self {
        RowRef {
            entity: entity.to_string(),
            key,
        }
    }
}

impl fmt::Display for RowRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.entity, self.key)
    }
}
