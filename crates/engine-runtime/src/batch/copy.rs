use crate::{
    batch::{
        config::{BatchCopyConfig, validate_pacing},
        driver::{BatchSpec, RunSummary, run_batch},
    },
    context::ExecutionContext,
    error::BatchError,
};
use engine_core::{
    error::ConfigError,
    ops::copy::CopyRow,
    queue::Job,
};
use tracing::info;

/// Bulk copy engine: relocates every row matching the configured query to
/// the destination entity, page by page, optionally deleting sources.
///
/// Callers must ensure no other run is mutating the same query's rows; the
/// engine takes no lease or lock.
pub struct BatchCopy {
    config: BatchCopyConfig,
    ctx: ExecutionContext,
}

impl BatchCopy {
    pub fn new(config: BatchCopyConfig, ctx: ExecutionContext) -> Self {
        BatchCopy { config, ctx }
    }

    pub async fn run(&self) -> Result<RunSummary, BatchError> {
        let config = &self.config;

        if !self.ctx.registry.contains(&config.to_entity) {
            return Err(ConfigError::UnknownDestination(config.to_entity.clone()).into());
        }
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
            to = %config.to_entity,
            page_size = pacing.page_size,
            limit = pacing.limit,
            as_jobs = config.as_jobs,
            "starting batch copy"
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
                let mut op = CopyRow::new(row_ref, &config.to_entity);
                if config.delete_source {
                    op = op.delete_source();
                }
                if let Some(deadline) = config.process_before {
                    op = op.process_before(deadline);
                }
                Job::Copy(op)
            },
        )
        .await
    }
}
