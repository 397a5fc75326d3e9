use crate::{
    batch::{
        config::{BatchDeleteConfig, validate_pacing},
        driver::{BatchSpec, RunSummary, run_batch},
    },
    context::ExecutionContext,
    error::BatchError,
};
use engine_core::{error::ConfigError, ops::delete::DeleteRow, queue::Job};
use tracing::info;

/// Bulk delete engine: hard-deletes every row matching the configured query,
/// page by page. Copy minus the destination write.
pub struct BatchDelete {
    config: BatchDeleteConfig,
    ctx: ExecutionContext,
}

impl BatchDelete {
    pub fn new(config: BatchDeleteConfig, ctx: ExecutionContext) -> Self {
        BatchDelete { config, ctx }
    }

    pub async fn run(&self) -> Result<RunSummary, BatchError> {
        let config = &self.config;

        let entity = self
            .ctx
            .registry
            .get(&config.query.entity)
            .map_err(|_| ConfigError::UnknownEntity(config.query.entity.clone()))?;
        let pacing = validate_pacing(
            config.page_size,
            config.limit,
            config.rate,
            config.as_jobs,
            self.ctx.queue.is_some(),
        )?;

        info!(
            from = %config.query.entity,
            page_size = pacing.page_size,
            limit = pacing.limit,
            as_jobs = config.as_jobs,
            "starting batch delete"
        );

        run_batch(
            &self.ctx,
            BatchSpec {
                entity,
                query: &config.query,
                pacing,
                process_before: config.process_before,
                as_jobs: config.as_jobs,
                queue: config.queue.as_deref(),
            },
            |row_ref| {
                let mut op = DeleteRow::new(row_ref);
                if let Some(deadline) = config.process_before {
                    op = op.process_before(deadline);
                }
                Job::Delete(op)
            },
        )
        .await
    }
}
