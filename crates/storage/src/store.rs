use crate::{error::StorageError, registry::EntityDef};
use async_trait::async_trait;
use model::{core::value::Value, query::SourceQuery, records::row::RowData};

/// Contract the orchestration engine requires of the storage collaborator.
///
/// `find_in_table` is the read-your-writes verification path: it must observe
/// the effect of a preceding `upsert`/`hard_delete` on the same store,
/// bypassing any replica lag.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Fetch a single row by primary key. `include_deleted` also returns
    /// soft-deleted rows for entities that support soft deletion.
    async fn fetch(
        &self,
        entity: &EntityDef,
        key: &Value,
        include_deleted: bool,
    ) -> Result<Option<RowData>, StorageError>;

    /// Insert or update a row keyed by `key_column`, writing the attribute
    /// set verbatim.
    async fn upsert(
        &self,
        table: &str,
        key_column: &str,
        row: &RowData,
    ) -> Result<(), StorageError>;

    /// Remove a row outright, bypassing soft deletion. Deleting an absent row
    /// is not an error.
    async fn hard_delete(
        &self,
        table: &str,
        key_column: &str,
        key: &Value,
    ) -> Result<(), StorageError>;

    /// Primary-read lookup used to verify writes took effect.
    async fn find_in_table(
        &self,
        table: &str,
        key_column: &str,
        key: &Value,
    ) -> Result<Option<RowData>, StorageError>;

    /// Column names of a table.
    async fn columns_of(&self, table: &str) -> Result<Vec<String>, StorageError>;

    /// Fetch the next page of up to `page_size` rows matching `query`,
    /// ordered by the entity's cursor column, strictly after `after`.
    /// An empty page means the scan is exhausted. The caller owns the cursor.
    async fn next_page(
        &self,
        entity: &EntityDef,
        query: &SourceQuery,
        after: Option<&Value>,
        page_size: u64,
    ) -> Result<Vec<RowData>, StorageError>;
}
