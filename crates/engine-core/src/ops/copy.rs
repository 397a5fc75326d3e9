use crate::{error::OpError, ops::is_expired};
use chrono::{DateTime, Utc};
use model::records::{row::RowData, row_ref::RowRef};
use serde::{Deserialize, Serialize};
use storage::{
    registry::{EntityDef, EntityRegistry},
    store::EntityStore,
};
use tracing::debug;

/// Copies exactly one row to another table-backed entity, optionally hard
/// deleting the source afterwards.
///
/// Carries only a `RowRef`, so it can be serialized, queued and delayed
/// arbitrarily: the row is re-resolved by primary key at execution time and
/// the copy uses its state then, not its state at enqueue time. Re-running
/// after a partial prior success is safe: the write is an upsert, keyed by
/// the primary key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CopyRow {
    pub source: RowRef,
    pub to_entity: String,
    pub delete_source: bool,
    pub process_before: Option<DateTime<Utc>>,
}

impl CopyRow {
    pub fn new(source: RowRef, to_entity: &str) -> Self {
        CopyRow {
            source,
            to_entity: to_entity.to_string(),
            delete_source: false,
            process_before: None,
        }
    }

    pub fn delete_source(mut self) -> Self {
        self.delete_source = true;
        self
    }

    pub fn process_before(mut self, deadline: DateTime<Utc>) -> Self {
        self.process_before = Some(deadline);
        self
    }

    pub async fn run(
        &self,
        store: &dyn EntityStore,
        registry: &EntityRegistry,
    ) -> Result<(), OpError> {
        if is_expired(self.process_before) {
            debug!(row = %self.source, "copy expired before execution, skipping");
            return Ok(());
        }

        let source_entity = registry.get(&self.source.entity)?;
        let destination = registry
            .get(&self.to_entity)
            .map_err(|_| OpError::UnknownDestination(self.to_entity.clone()))?;

        // Re-resolve the row now; soft-deleted rows are still copyable.
        let row = store
            .fetch(source_entity, &self.source.key, true)
            .await?
            .ok_or_else(|| OpError::SourceRowMissing {
                row: self.source.to_string(),
            })?;

        self.validate_columns(store, destination, &row).await?;

        // Byte-for-byte relocation: the full attribute set, soft-delete
        // marker and timestamps included, keyed by the original primary key.
        let copied = RowData::new(&destination.name, row.field_values.clone());
        store
            .upsert(&destination.table, &destination.key_column, &copied)
            .await?;
        self.confirm_copied(store, destination).await?;

        if self.delete_source {
            store
                .hard_delete(
                    &source_entity.table,
                    &source_entity.key_column,
                    &self.source.key,
                )
                .await?;
            self.confirm_source_deleted(store, source_entity).await?;
        }

        debug!(row = %self.source, to = %self.to_entity, "row copied");
        Ok(())
    }

    /// The destination table must carry every column of the source row; the
    /// copy fails closed on mismatch, it does not adapt.
    async fn validate_columns(
        &self,
        store: &dyn EntityStore,
        destination: &EntityDef,
        row: &RowData,
    ) -> Result<(), OpError> {
        let destination_columns = store.columns_of(&destination.table).await?;

        let mut missing: Vec<String> = row
            .columns()
            .into_iter()
            .filter(|c| {
                !destination_columns
                    .iter()
                    .any(|d| d.eq_ignore_ascii_case(c))
            })
            .collect();

        if missing.is_empty() {
            return Ok(());
        }

        missing.sort();
        Err(OpError::MissingColumns {
            row: self.source.to_string(),
            table: destination.table.clone(),
            columns: missing,
        })
    }

    async fn confirm_copied(
        &self,
        store: &dyn EntityStore,
        destination: &EntityDef,
    ) -> Result<(), OpError> {
        let written = store
            .find_in_table(&destination.table, &destination.key_column, &self.source.key)
            .await?;
        if written.is_none() {
            return Err(OpError::CopyNotConfirmed {
                row: self.source.to_string(),
            });
        }
        Ok(())
    }

    async fn confirm_source_deleted(
        &self,
        store: &dyn EntityStore,
        source_entity: &EntityDef,
    ) -> Result<(), OpError> {
        let remaining = store
            .find_in_table(
                &source_entity.table,
                &source_entity.key_column,
                &self.source.key,
            )
            .await?;
        if remaining.is_some() {
            return Err(OpError::DeleteNotConfirmed {
                row: self.source.to_string(),
            });
        }
        Ok(())
    }
}
