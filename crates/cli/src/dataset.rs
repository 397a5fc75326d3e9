use crate::error::CliError;
use model::{
    core::value::{FieldValue, Value},
    records::row::RowData,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use storage::{memory::MemoryStore, registry::EntityDef, registry::EntityRegistry};

/// On-disk dataset the CLI operates on: entity definitions plus table
/// contents, as one JSON document.
#[derive(Debug, Serialize, Deserialize)]
pub struct Dataset {
    pub entities: Vec<EntityDef>,
    pub tables: BTreeMap<String, TableSpec>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TableSpec {
    pub columns: Vec<String>,
    pub rows: Vec<serde_json::Map<String, serde_json::Value>>,
}

impl Dataset {
    pub fn load(path: &str) -> Result<Self, CliError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn registry(&self) -> EntityRegistry {
        self.entities
            .iter()
            .fold(EntityRegistry::new(), |registry, entity| {
                registry.register(entity.clone())
            })
    }

    /// Materialize the dataset into the in-memory store.
    pub fn store(&self) -> MemoryStore {
        let store = MemoryStore::new();
        for (table, spec) in &self.tables {
            let columns: Vec<&str> = spec.columns.iter().map(String::as_str).collect();
            store.create_table(table, &columns);

            let key_column = self.key_column_of(table);
            for row in &spec.rows {
                store.insert(table, &key_column, json_to_row(table, row));
            }
        }
        store
    }

    /// Snapshot the store back into the dataset's table contents.
    pub fn absorb(&mut self, store: &MemoryStore) {
        for (table, spec) in self.tables.iter_mut() {
            spec.rows = store.rows_of(table).iter().map(row_to_json).collect();
        }
    }

    pub fn save(&self, path: &str) -> Result<(), CliError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    fn key_column_of(&self, table: &str) -> String {
        self.entities
            .iter()
            .find(|e| e.table == table)
            .map(|e| e.key_column.clone())
            .unwrap_or_else(|| "id".to_string())
    }
}

pub fn json_to_value(value: &serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(v) => Value::Boolean(*v),
        serde_json::Value::Number(n) => {
            if let Some(v) = n.as_i64() {
                Value::Int(v)
            } else if let Some(v) = n.as_u64() {
                Value::Uint(v)
            } else {
                Value::Float(n.as_f64().unwrap_or(0.0))
            }
        }
        serde_json::Value::String(v) => Value::String(v.clone()),
        other => Value::Json(other.clone()),
    }
}

pub fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Int(v) => serde_json::Value::from(*v),
        Value::Uint(v) => serde_json::Value::from(*v),
        Value::Float(v) => serde_json::Value::from(*v),
        Value::String(v) => serde_json::Value::from(v.clone()),
        Value::Boolean(v) => serde_json::Value::from(*v),
        Value::Json(v) => v.clone(),
        Value::Uuid(v) => serde_json::Value::from(v.to_string()),
        Value::Bytes(v) => serde_json::Value::from(v.clone()),
        Value::Timestamp(v) => serde_json::Value::from(v.to_rfc3339()),
        Value::Null => serde_json::Value::Null,
    }
}

fn json_to_row(table: &str, object: &serde_json::Map<String, serde_json::Value>) -> RowData {
    let field_values = object
        .iter()
        .map(|(name, value)| {
            let value = json_to_value(value);
            FieldValue::new(name, (!value.is_null()).then_some(value))
        })
        .collect();
    RowData::new(table, field_values)
}

fn row_to_json(row: &RowData) -> serde_json::Map<String, serde_json::Value> {
    row.field_values
        .iter()
        .map(|f| {
            let value = f
                .value
                .as_ref()
                .map(value_to_json)
                .unwrap_or(serde_json::Value::Null);
            (f.name.clone(), value)
        })
        .collect()
}
