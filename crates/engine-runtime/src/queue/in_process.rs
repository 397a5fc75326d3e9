use async_trait::async_trait;
use engine_core::{
    error::QueueError,
    queue::{Job, JobHandle, JobQueue},
};
use std::{sync::Arc, time::Duration};
use storage::{registry::EntityRegistry, store::EntityStore};
use tokio::{sync::Mutex, task::JoinHandle, time::sleep};
use tracing::{debug, error};
use uuid::Uuid;

/// Tokio-task substrate for running without an external queue. Honors the
/// delay as not-before and logs job failures; retry policy and durability
/// are out of scope here, a production deployment wires a real queue in.
pub struct InProcessQueue {
    store: Arc<dyn EntityStore>,
    registry: Arc<EntityRegistry>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl InProcessQueue {
    pub fn new(store: Arc<dyn EntityStore>, registry: Arc<EntityRegistry>) -> Self {
        InProcessQueue {
            store,
            registry,
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Waits for every job enqueued so far to finish.
    pub async fn drain(&self) {
        let handles: Vec<JoinHandle<()>> = self.tasks.lock().await.drain(..).collect();
        for handle in handles {
            if let Err(err) = handle.await {
                error!(error = %err, "queued job task panicked");
            }
        }
    }
}

#[async_trait]
impl JobQueue for InProcessQueue {
    async fn enqueue(
        &self,
        job: Job,
        delay: Option<Duration>,
        queue: Option<&str>,
    ) -> Result<JobHandle, QueueError> {
        let handle_id = JobHandle(format!("job-{}", Uuid::new_v4()));
        debug!(
            handle = %handle_id,
            delay_secs = delay.map(|d| d.as_secs()),
            queue = queue,
            "enqueueing job"
        );

        let store = self.store.clone();
        let registry = self.registry.clone();
        let id = handle_id.clone();
        let task = tokio::spawn(async move {
            if let Some(delay) = delay {
                sleep(delay).await;
            }
            if let Err(err) = job.run(store.as_ref(), registry.as_ref()).await {
                error!(handle = %id, error = %err, "queued job failed");
            }
        });

        self.tasks.lock().await.push(task);
        Ok(handle_id)
    }
}
