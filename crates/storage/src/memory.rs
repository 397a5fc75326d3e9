use crate::{
    error::StorageError,
    registry::{EntityDef, SOFT_DELETE_COLUMN},
    store::EntityStore,
};
use async_trait::async_trait;
use model::{core::value::Value, query::SourceQuery, records::row::RowData};
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;
use uuid::Uuid;

/// Totally ordered wrapper over the key value types usable as a paging
/// cursor. Ordering across variants is by discriminant, within a variant by
/// value, which keeps a homogeneous key column stably ordered.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum KeyValue {
    Int(i64),
    Uint(u64),
    Str(String),
    Uuid(Uuid),
}

impl KeyValue {
    pub fn try_from_value(value: &Value) -> Result<KeyValue, StorageError> {
        match value {
            Value::Int(v) => Ok(KeyValue::Int(*v)),
            Value::Uint(v) => Ok(KeyValue::Uint(*v)),
            Value::String(v) => Ok(KeyValue::Str(v.clone())),
            Value::Uuid(v) => Ok(KeyValue::Uuid(*v)),
            Value::Timestamp(v) => Ok(KeyValue::Int(v.timestamp_micros())),
            other => Err(StorageError::UnsupportedKey(other.to_string())),
        }
    }
}

#[derive(Debug, Default)]
struct Table {
    columns: Vec<String>,
    rows: BTreeMap<KeyValue, RowData>,
}

/// In-memory reference backend: ordered tables with declared column sets.
/// Stands in for a real database behind the `EntityStore` contract; writes
/// are immediately visible to `find_in_table`, so it trivially satisfies the
/// read-your-writes requirement.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Table>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_table(&self, table: &str, columns: &[&str]) {
        let mut tables = self.tables.write().unwrap_or_else(|e| e.into_inner());
        tables.insert(
            table.to_string(),
            Table {
                columns: columns.iter().map(|c| c.to_string()).collect(),
                rows: BTreeMap::new(),
            },
        );
    }

    /// Seed a row directly, bypassing the async store contract.
    pub fn insert(&self, table: &str, key_column: &str, row: RowData) {
        let key = KeyValue::try_from_value(&row.get_value(key_column))
            .unwrap_or_else(|_| KeyValue::Str(format!("{row:?}")));
        let mut tables = self.tables.write().unwrap_or_else(|e| e.into_inner());
        tables.entry(table.to_string()).or_default().rows.insert(key, row);
    }

    pub fn row_count(&self, table: &str) -> usize {
        let tables = self.tables.read().unwrap_or_else(|e| e.into_inner());
        tables.get(table).map(|t| t.rows.len()).unwrap_or(0)
    }

    /// All rows of a table in cursor order.
    pub fn rows_of(&self, table: &str) -> Vec<RowData> {
        let tables = self.tables.read().unwrap_or_else(|e| e.into_inner());
        tables
            .get(table)
            .map(|t| t.rows.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn table_columns(&self, table: &str) -> Vec<String> {
        let tables = self.tables.read().unwrap_or_else(|e| e.into_inner());
        tables
            .get(table)
            .map(|t| t.columns.clone())
            .unwrap_or_default()
    }

    fn is_soft_deleted(entity: &EntityDef, row: &RowData) -> bool {
        entity.soft_delete && !row.get_value(SOFT_DELETE_COLUMN).is_null()
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn fetch(
        &self,
        entity: &EntityDef,
        key: &Value,
        include_deleted: bool,
    ) -> Result<Option<RowData>, StorageError> {
        let key = KeyValue::try_from_value(key)?;
        let tables = self.tables.read().unwrap_or_else(|e| e.into_inner());
        let table = tables
            .get(&entity.table)
            .ok_or_else(|| StorageError::UnknownTable(entity.table.clone()))?;

        let row = match table.rows.get(&key) {
            Some(row) => row,
            None => return Ok(None),
        };

        if !include_deleted && Self::is_soft_deleted(entity, row) {
            return Ok(None);
        }

        Ok(Some(row.clone()))
    }

    async fn upsert(
        &self,
        table: &str,
        key_column: &str,
        row: &RowData,
    ) -> Result<(), StorageError> {
        let key_value = row.get_value(key_column);
        if key_value.is_null() {
            return Err(StorageError::MissingKey {
                table: table.to_string(),
                column: key_column.to_string(),
            });
        }
        let key = KeyValue::try_from_value(&key_value)?;

        let mut tables = self.tables.write().unwrap_or_else(|e| e.into_inner());
        let table = tables
            .get_mut(table)
            .ok_or_else(|| StorageError::UnknownTable(table.to_string()))?;
        table.rows.insert(key, row.clone());
        Ok(())
    }

    async fn hard_delete(
        &self,
        table: &str,
        _key_column: &str,
        key: &Value,
    ) -> Result<(), StorageError> {
        let key = KeyValue::try_from_value(key)?;
        let mut tables = self.tables.write().unwrap_or_else(|e| e.into_inner());
        let table = tables
            .get_mut(table)
            .ok_or_else(|| StorageError::UnknownTable(table.to_string()))?;
        table.rows.remove(&key);
        Ok(())
    }

    async fn find_in_table(
        &self,
        table: &str,
        _key_column: &str,
        key: &Value,
    ) -> Result<Option<RowData>, StorageError> {
        let key = KeyValue::try_from_value(key)?;
        let tables = self.tables.read().unwrap_or_else(|e| e.into_inner());
        let table = tables
            .get(table)
            .ok_or_else(|| StorageError::UnknownTable(table.to_string()))?;
        Ok(table.rows.get(&key).cloned())
    }

    async fn columns_of(&self, table: &str) -> Result<Vec<String>, StorageError> {
        let tables = self.tables.read().unwrap_or_else(|e| e.into_inner());
        let table = tables
            .get(table)
            .ok_or_else(|| StorageError::UnknownTable(table.to_string()))?;
        Ok(table.columns.clone())
    }

    async fn next_page(
        &self,
        entity: &EntityDef,
        query: &SourceQuery,
        after: Option<&Value>,
        page_size: u64,
    ) -> Result<Vec<RowData>, StorageError> {
        let cursor_column = entity.cursor_column();
        let after = match after {
            Some(value) => Some(KeyValue::try_from_value(value)?),
            None => None,
        };

        let tables = self.tables.read().unwrap_or_else(|e| e.into_inner());
        let table = tables
            .get(&entity.table)
            .ok_or_else(|| StorageError::UnknownTable(entity.table.clone()))?;

        let mut matching: Vec<(KeyValue, RowData)> = Vec::new();
        for row in table.rows.values() {
            if !query.with_deleted && Self::is_soft_deleted(entity, row) {
                continue;
            }
            if !query.matches(row) {
                continue;
            }
            let cursor = KeyValue::try_from_value(&row.get_value(cursor_column))?;
            if let Some(after) = &after
                && cursor <= *after
            {
                continue;
            }
            matching.push((cursor, row.clone()));
        }

        matching.sort_by(|(a, _), (b, _)| a.cmp(b));
        matching.truncate(page_size as usize);
        Ok(matching.into_iter().map(|(_, row)| row).collect())
    }
}
