use crate::error::StorageError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Column conventionally holding the soft-delete marker.
pub const SOFT_DELETE_COLUMN: &str = "deleted_at";

fn default_key_column() -> String {
    "id".to_string()
}

/// Static description of a table-backed entity type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityDef {
    pub name: String,
    pub table: String,

    /// Primary key column, `id` by default.
    #[serde(default = "default_key_column")]
    pub key_column: String,

    /// Stable cursor column for paging when the primary key is not
    /// sequentially ordered. Falls back to the primary key.
    #[serde(default)]
    pub order_column: Option<String>,

    /// Whether the entity supports soft deletion via `deleted_at`.
    #[serde(default)]
    pub soft_delete: bool,
}

impl EntityDef {
    pub fn new(name: &str, table: &str) -> Self {
        EntityDef {
            name: name.to_string(),
            table: table.to_string(),
            key_column: default_key_column(),
            order_column: None,
            soft_delete: false,
        }
    }

    pub fn soft_delete(mut self) -> Self {
        self.soft_delete = true;
        self
    }

    pub fn order_by(mut self, column: &str) -> Self {
        self.order_column = Some(column.to_string());
        self
    }

    /// Column used as the paging cursor.
    pub fn cursor_column(&self) -> &str {
        self.order_column.as_deref().unwrap_or(&self.key_column)
    }
}

/// Explicit lookup of entity definitions by name. Injected into the engine
/// instead of any ambient resolution, so a test registry is all a test needs.
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    entities: HashMap<String, EntityDef>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, entity: EntityDef) -> Self {
        self.entities.insert(entity.name.clone(), entity);
        self
    }

    pub fn get(&self, name: &str) -> Result<&EntityDef, StorageError> {
        self.entities
            .get(name)
            .ok_or_else(|| StorageError::UnknownEntity(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entities.contains_key(name)
    }
}
