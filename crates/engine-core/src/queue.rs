use crate::{
    error::{OpError, QueueError},
    ops::{copy::CopyRow, delete::DeleteRow},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// The unit of work handed to the asynchronous substrate: one row operation,
/// serializable so it can cross a queue boundary and run much later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Job {
    Copy(CopyRow),
    Delete(DeleteRow),
}

impl Job {
    /// Worker-side entry point.
    pub async fn run(
        &self,
        store: &dyn storage::store::EntityStore,
        registry: &storage::registry::EntityRegistry,
    ) -> Result<(), OpError> {
        match self {
            Job::Copy(op) => op.run(store, registry).await,
            Job::Delete(op) => op.run(store, registry).await,
        }
    }
}

/// Opaque identifier of an enqueued job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobHandle(pub String);

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Contract of the asynchronous execution substrate: at-least-once delivery,
/// `delay` honored as not-before, optional named-queue routing. Enqueueing
/// never blocks on job completion; delivery failures and retries are the
/// substrate's concern, not the dispatcher's.
#[async_trait]
pub trait JobQueue: Send + Sync {
    async fn enqueue(
        &self,
        job: Job,
        delay: Option<Duration>,
        queue: Option<&str>,
    ) -> Result<JobHandle, QueueError>;
}
