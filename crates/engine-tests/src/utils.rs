use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use engine_core::{
    error::QueueError,
    queue::{Job, JobHandle, JobQueue},
};
use engine_runtime::context::ExecutionContext;
use model::{
    core::value::{FieldValue, Value},
    query::SourceQuery,
    records::row::RowData,
};
use std::{
    sync::{Arc, Mutex},
    time::Duration,
};
use storage::{
    error::StorageError,
    memory::MemoryStore,
    registry::{EntityDef, EntityRegistry},
    store::EntityStore,
};

/// Column set shared by the wide test tables.
pub const WIDE_COLUMNS: &[&str] = &["id", "name", "b", "deleted_at", "created_at", "updated_at"];

/// Standard test registry: `example_a` is the soft-deleting source,
/// `example_b` a structurally identical destination, `example_c` a narrower
/// destination for schema-mismatch scenarios, `example_d` pages on an
/// explicit ordering column.
pub fn registry() -> EntityRegistry {
    EntityRegistry::new()
        .register(EntityDef::new("example_a", "example_a").soft_delete())
        .register(EntityDef::new("example_b", "example_b").soft_delete())
        .register(EntityDef::new("example_c", "example_c"))
        .register(
            EntityDef::new("example_d", "example_d")
                .soft_delete()
                .order_by("created_at"),
        )
}

/// Deterministic per-row timestamp so copies can be checked byte-for-byte.
pub fn timestamp(id: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().unwrap()
        + chrono::Duration::minutes(id)
}

pub fn sample_row(id: i64) -> RowData {
    RowData::new(
        "example_a",
        vec![
            FieldValue::new("id", Some(Value::Int(id))),
            FieldValue::new("name", Some(Value::String(format!("row-{id}")))),
            FieldValue::new("b", Some(Value::Boolean(id % 2 == 0))),
            FieldValue::new("deleted_at", None),
            FieldValue::new("created_at", Some(Value::Timestamp(timestamp(id)))),
            FieldValue::new("updated_at", Some(Value::Timestamp(timestamp(id)))),
        ],
    )
}

pub fn soft_deleted_row(id: i64) -> RowData {
    let mut row = sample_row(id);
    row.field_values[3] = FieldValue::new("deleted_at", Some(Value::Timestamp(timestamp(id))));
    row
}

/// Fresh store with all four test tables created and `example_a` holding
/// `rows` live rows keyed 1..=rows.
pub fn seeded_store(rows: i64) -> MemoryStore {
    let store = MemoryStore::new();
    store.create_table("example_a", WIDE_COLUMNS);
    store.create_table("example_b", WIDE_COLUMNS);
    store.create_table("example_c", &["id", "name"]);
    store.create_table("example_d", WIDE_COLUMNS);
    for id in 1..=rows {
        store.insert("example_a", "id", sample_row(id));
    }
    store
}

pub fn context(store: &Arc<MemoryStore>) -> ExecutionContext {
    ExecutionContext::new(store.clone(), Arc::new(registry()))
}

pub fn all_rows(entity: &str) -> SourceQuery {
    SourceQuery::new(entity)
}

/// One captured `enqueue` call.
#[derive(Debug, Clone)]
pub struct PushedJob {
    pub job: Job,
    pub delay: Option<Duration>,
    pub queue: Option<String>,
}

/// Queue double that records every dispatch instead of executing it, so
/// tests can assert on delays, routing and job payloads.
#[derive(Default)]
pub struct RecordingQueue {
    pushed: Mutex<Vec<PushedJob>>,
}

impl RecordingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pushed(&self) -> Vec<PushedJob> {
        self.pushed.lock().unwrap().clone()
    }

    /// Delays of all captured jobs in whole seconds; absent delays count as 0.
    pub fn delays_in_secs(&self) -> Vec<u64> {
        self.pushed()
            .iter()
            .map(|p| p.delay.map(|d| d.as_secs()).unwrap_or(0))
            .collect()
    }
}

#[async_trait]
impl JobQueue for RecordingQueue {
    async fn enqueue(
        &self,
        job: Job,
        delay: Option<Duration>,
        queue: Option<&str>,
    ) -> Result<JobHandle, QueueError> {
        let mut pushed = self.pushed.lock().unwrap();
        let handle = JobHandle(format!("recorded-{}", pushed.len()));
        pushed.push(PushedJob {
            job,
            delay,
            queue: queue.map(str::to_string),
        });
        Ok(handle)
    }
}

/// Store wrapper that silently swallows selected writes, used to prove the
/// read-your-writes verification turns lost writes into hard errors.
pub struct UnreliableStore {
    inner: MemoryStore,
    drop_upserts: bool,
    drop_deletes: bool,
}

impl UnreliableStore {
    pub fn dropping_upserts(inner: MemoryStore) -> Self {
        UnreliableStore {
            inner,
            drop_upserts: true,
            drop_deletes: false,
        }
    }

    pub fn dropping_deletes(inner: MemoryStore) -> Self {
        UnreliableStore {
            inner,
            drop_upserts: false,
            drop_deletes: true,
        }
    }
}

#[async_trait]
impl EntityStore for UnreliableStore {
    async fn fetch(
        &self,
        entity: &EntityDef,
        key: &Value,
        include_deleted: bool,
    ) -> Result<Option<RowData>, StorageError> {
        self.inner.fetch(entity, key, include_deleted).await
    }

    async fn upsert(
        &self,
        table: &str,
        key_column: &str,
        row: &RowData,
    ) -> Result<(), StorageError> {
        if self.drop_upserts {
            return Ok(());
        }
        self.inner.upsert(table, key_column, row).await
    }

    async fn hard_delete(
        &self,
        table: &str,
        key_column: &str,
        key: &Value,
    ) -> Result<(), StorageError> {
        if self.drop_deletes {
            return Ok(());
        }
        self.inner.hard_delete(table, key_column, key).await
    }

    async fn find_in_table(
        &self,
        table: &str,
        key_column: &str,
        key: &Value,
    ) -> Result<Option<RowData>, StorageError> {
        self.inner.find_in_table(table, key_column, key).await
    }

    async fn columns_of(&self, table: &str) -> Result<Vec<String>, StorageError> {
        self.inner.columns_of(table).await
    }

    async fn next_page(
        &self,
        entity: &EntityDef,
        query: &SourceQuery,
        after: Option<&Value>,
        page_size: u64,
    ) -> Result<Vec<RowData>, StorageError> {
        self.inner.next_page(entity, query, after, page_size).await
    }
}
