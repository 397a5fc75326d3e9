use crate::{error::OpError, ops::is_expired};
use chrono::{DateTime, Utc};
use model::records::row_ref::RowRef;
use serde::{Deserialize, Serialize};
use storage::{registry::EntityRegistry, store::EntityStore};
use tracing::debug;

/// Hard-deletes exactly one row, bypassing soft deletion.
///
/// Like `CopyRow` this carries only a `RowRef` and re-resolves the row at
/// execution time. A row that is already gone counts as success, which makes
/// the operation safe under at-least-once redelivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteRow {
    pub source: RowRef,
    pub process_before: Option<DateTime<Utc>>,
}

impl DeleteRow {
    pub fn new(source: RowRef) -> Self {
        DeleteRow {
            source,
            process_before: None,
        }
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
            debug!(row = %self.source, "delete expired before execution, skipping");
            return Ok(());
        }

        let entity = registry.get(&self.source.entity)?;

        let row = store.fetch(entity, &self.source.key, true).await?;
        if row.is_none() {
            debug!(row = %self.source, "row already absent, nothing to delete");
            return Ok(());
        }

        store
            .hard_delete(&entity.table, &entity.key_column, &self.source.key)
            .await?;

        let remaining = store
            .find_in_table(&entity.table, &entity.key_column, &self.source.key)
            .await?;
        if remaining.is_some() {
            return Err(OpError::DeleteNotConfirmed {
                row: self.source.to_string(),
            });
        }

        debug!(row = %self.source, "row deleted");
        Ok(())
    }
}
