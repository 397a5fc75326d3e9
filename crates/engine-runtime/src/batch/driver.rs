use crate::{batch::config::Pacing, context::ExecutionContext, error::BatchError};
use chrono::{DateTime, Duration, Utc};
use engine_core::{queue::Job, throttle};
use model::{core::value::Value, query::SourceQuery, records::row_ref::RowRef};
use storage::{error::StorageError, registry::EntityDef};
use tracing::{debug, info};

/// Why a run stopped. All three are successful terminations; a run cut short
/// by its limit or deadline did exactly what it was configured to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The paginator ran out of rows.
    Exhausted,
    /// The row-count ceiling was crossed.
    LimitReached,
    /// The next scheduled dispatch would land past the deadline.
    DeadlineExceeded,
}

#[derive(Debug, Clone, Copy)]
pub struct RunSummary {
    /// Rows examined, whether or not they were dispatched.
    pub examined: u64,
    /// Rows executed inline or handed to the queue.
    pub dispatched: u64,
    pub termination: Termination,
}

/// Everything the shared driver loop needs for one run.
pub(crate) struct BatchSpec<'a> {
    pub entity: &'a EntityDef,
    pub query: &'a SourceQuery,
    pub pacing: Pacing,
    pub process_before: Option<DateTime<Utc>>,
    pub as_jobs: bool,
    pub queue: Option<&'a str>,
}

/// Mutable state of one run; created fresh per run, never shared.
struct RunState {
    processed: u64,
    dispatched: u64,
    started_at: DateTime<Utc>,
    /// Most recently computed cumulative delay; only set once a rate-delayed
    /// dispatch has happened, which is what arms the deadline check.
    scheduled_delay: Option<Duration>,
}

impl RunState {
    fn new() -> Self {
        RunState {
            processed: 0,
            dispatched: 0,
            started_at: Utc::now(),
            scheduled_delay: None,
        }
    }

    fn past_deadline(&self, deadline: Option<DateTime<Utc>>) -> bool {
        match (self.scheduled_delay, deadline) {
            (Some(delay), Some(deadline)) => throttle::has_exceeded_deadline(
                throttle::scheduled_at(self.started_at, delay),
                deadline,
            ),
            _ => false,
        }
    }
}

/// The paging loop shared by batch copy and batch delete: fetch pages, apply
/// the limit and deadline checks at page and row granularity, dispatch one
/// operation per row. Either check failing is a hard stop for the whole run.
pub(crate) async fn run_batch<F>(
    ctx: &ExecutionContext,
    spec: BatchSpec<'_>,
    make_job: F,
) -> Result<RunSummary, BatchError>
where
    F: Fn(RowRef) -> Job,
{
    let mut state = RunState::new();
    let cursor_column = spec.entity.cursor_column();
    let mut after: Option<Value> = None;

    let termination = 'paging: loop {
        let rows = ctx
            .store
            .next_page(spec.entity, spec.query, after.as_ref(), spec.pacing.page_size)
            .await?;

        if rows.is_empty() {
            break Termination::Exhausted;
        }

        if throttle::has_reached_limit(state.processed, spec.pacing.limit) {
            break Termination::LimitReached;
        }
        if state.past_deadline(spec.process_before) {
            break Termination::DeadlineExceeded;
        }

        debug!(
            entity = %spec.entity.name,
            rows = rows.len(),
            after = ?after,
            "processing page"
        );

        let page_len = rows.len() as u64;
        for row in &rows {
            state.processed += 1;

            if throttle::has_reached_limit(state.processed, spec.pacing.limit) {
                break 'paging Termination::LimitReached;
            }
            if state.past_deadline(spec.process_before) {
                break 'paging Termination::DeadlineExceeded;
            }

            let key = row.get_value(&spec.entity.key_column);
            if key.is_null() {
                return Err(StorageError::MissingKey {
                    table: spec.entity.table.clone(),
                    column: spec.entity.key_column.clone(),
                }
                .into());
            }

            let job = make_job(RowRef::new(&spec.entity.name, key));
            dispatch(ctx, &spec, &mut state, job).await?;
            state.dispatched += 1;
        }

        if page_len < spec.pacing.page_size {
            break Termination::Exhausted;
        }

        after = rows
            .last()
            .map(|row| row.get_value(cursor_column))
            .filter(|v| !v.is_null());
        if after.is_none() {
            return Err(StorageError::MissingKey {
                table: spec.entity.table.clone(),
                column: cursor_column.to_string(),
            }
            .into());
        }
    };

    let summary = RunSummary {
        examined: state.processed,
        dispatched: state.dispatched,
        termination,
    };
    info!(
        entity = %spec.entity.name,
        examined = summary.examined,
        dispatched = summary.dispatched,
        termination = ?summary.termination,
        "batch run finished"
    );
    Ok(summary)
}

/// Executes the operation inline, or hands it to the substrate with the
/// rate-computed delay and optional queue routing. Inline failures abort the
/// run; queued execution failures belong to the substrate.
async fn dispatch(
    ctx: &ExecutionContext,
    spec: &BatchSpec<'_>,
    state: &mut RunState,
    job: Job,
) -> Result<(), BatchError> {
    if !spec.as_jobs {
        return Ok(job
            .run(ctx.store.as_ref(), ctx.registry.as_ref())
            .await?);
    }

    // Presence of the queue is part of configuration validation.
    let queue = ctx
        .queue
        .as_ref()
        .ok_or(engine_core::error::ConfigError::QueueRequired)?;

    let delay = spec.pacing.rate.map(|rate| {
        let delay = throttle::delay_for_row(state.processed, rate);
        state.scheduled_delay = Some(delay);
        delay
    });

    queue
        .enqueue(
            job,
            delay.map(|d| d.to_std().unwrap_or_default()),
            spec.queue,
        )
        .await?;
    Ok(())
}
