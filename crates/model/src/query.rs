use crate::{core::value::Value, records::row::RowData};
use serde::{Deserialize, Serialize};

/// An equality predicate over a single column.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldFilter {
    pub field: String,
    pub value: Value,
}

/// A filtered query descriptor over a source entity. The storage collaborator
/// applies the filters and supplies the ordering; the engine only walks the
/// result in pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceQuery {
    pub entity: String,
    pub filters: Vec<FieldFilter>,
    /// Include soft-deleted rows in the scan. Off by default, matching the
    /// usual live-rows-only read path.
    pub with_deleted: bool,
}

impl SourceQuery {
    pub fn new(entity: &str) -> Self {
        SourceQuery {
            entity: entity.to_string(),
            filters: Vec::new(),
            with_deleted: false,
        }
    }

    pub fn filter(mut self, field: &str, value: Value) -> Self {
        self.filters.push(FieldFilter {
            field: field.to_string(),
            value,
        });
        self
    }

    pub fn with_deleted(mut self) -> Self {
        self.with_deleted = true;
        self
    }

    /// Whether a row satisfies every configured filter.
    pub fn matches(&self, row: &RowData) -> bool {
        self.filters
            .iter()
            .all(|f| row.get_value(&f.field) == f.value)
    }
}
