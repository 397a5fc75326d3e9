use engine_core::queue::JobQueue;
use std::sync::Arc;
use storage::{registry::EntityRegistry, store::EntityStore};

/// Shared collaborators injected into the batch drivers: the storage engine,
/// the entity registry and (optionally) the asynchronous substrate.
#[derive(Clone)]
pub struct ExecutionContext {
    pub store: Arc<dyn EntityStore>,
    pub registry: Arc<EntityRegistry>,
    pub queue: Option<Arc<dyn JobQueue>>,
}

impl ExecutionContext {
    pub fn new(store: Arc<dyn EntityStore>, registry: Arc<EntityRegistry>) -> Self {
        ExecutionContext {
            store,
            registry,
            queue: None,
        }
    }

    pub fn with_queue(mut self, queue: Arc<dyn JobQueue>) -> Self {
        self.queue = Some(queue);
        self
    }
}
