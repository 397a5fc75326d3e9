use crate::{commands::Commands, dataset::Dataset, error::CliError};
use chrono::{DateTime, Utc};
use clap::Parser;
use engine_core::ops::{copy::CopyRow, delete::DeleteRow};
use engine_runtime::{
    batch::{
        config::{BatchCopyConfig, BatchDeleteConfig},
        copy::BatchCopy,
        delete::BatchDelete,
        driver::RunSummary,
    },
    context::ExecutionContext,
    queue::in_process::InProcessQueue,
};
use model::{core::value::Value, query::SourceQuery, records::row_ref::RowRef};
use std::sync::Arc;
use storage::{memory::MemoryStore, registry::EntityRegistry};
use tracing::Level;

mod commands;
mod dataset;
mod error;

#[derive(Parser)]
#[command(name = "rowlift", version = "0.1.0", about = "Bulk row relocation tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    // Initialize logger
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Copy {
            data,
            from,
            to,
            filter,
            page_size,
            limit,
            delete_source,
            process_before,
            rate,
            as_jobs,
            queue,
            output,
        } => {
            let mut dataset = Dataset::load(&data)?;
            let (store, registry) = open(&dataset);
            let (ctx, in_process) = context(&store, &registry, as_jobs);

            let mut config =
                BatchCopyConfig::new(build_query(&from, &filter)?, &to).page_size(page_size);
            config = config.limit(limit);
            if delete_source {
                config = config.delete_source();
            }
            if let Some(deadline) = parse_deadline(process_before.as_deref())? {
                config = config.process_before(deadline);
            }
            if let Some(rate) = rate {
                config = config.rate(rate);
            }
            if as_jobs {
                config = config.as_jobs();
            }
            if let Some(queue) = &queue {
                config = config.on_queue(queue);
            }

            let summary = BatchCopy::new(config, ctx).run().await?;
            if let Some(queue) = in_process {
                queue.drain().await;
            }

            print_summary(&summary);
            write_back(dataset, &store, &data, output)?;
        }
        Commands::Delete {
            data,
            from,
            filter,
            page_size,
            limit,
            process_before,
            rate,
            as_jobs,
            queue,
            output,
        } => {
            let mut dataset = Dataset::load(&data)?;
            let (store, registry) = open(&dataset);
            let (ctx, in_process) = context(&store, &registry, as_jobs);

            let mut config = BatchDeleteConfig::new(build_query(&from, &filter)?)
                .page_size(page_size)
                .limit(limit);
            if let Some(deadline) = parse_deadline(process_before.as_deref())? {
                config = config.process_before(deadline);
            }
            if let Some(rate) = rate {
                config = config.rate(rate);
            }
            if as_jobs {
                config = config.as_jobs();
            }
            if let Some(queue) = &queue {
                config = config.on_queue(queue);
            }

            let summary = BatchDelete::new(config, ctx).run().await?;
            if let Some(queue) = in_process {
                queue.drain().await;
            }

            print_summary(&summary);
            write_back(dataset, &store, &data, output)?;
        }
        Commands::CopyRow {
            data,
            from,
            key,
            to,
            delete_source,
            process_before,
            output,
        } => {
            let mut dataset = Dataset::load(&data)?;
            let (store, registry) = open(&dataset);

            let mut op = CopyRow::new(RowRef::new(&from, parse_value(&key)), &to);
            if delete_source {
                op = op.delete_source();
            }
            if let Some(deadline) = parse_deadline(process_before.as_deref())? {
                op = op.process_before(deadline);
            }
            op.run(store.as_ref(), registry.as_ref()).await?;

            println!("Copied row {key} from '{from}' to '{to}'");
            write_back(dataset, &store, &data, output)?;
        }
        Commands::DeleteRow {
            data,
            from,
            key,
            process_before,
            output,
        } => {
            let mut dataset = Dataset::load(&data)?;
            let (store, registry) = open(&dataset);

            let mut op = DeleteRow::new(RowRef::new(&from, parse_value(&key)));
            if let Some(deadline) = parse_deadline(process_before.as_deref())? {
                op = op.process_before(deadline);
            }
            op.run(store.as_ref(), registry.as_ref()).await?;

            println!("Deleted row {key} from '{from}'");
            write_back(dataset, &store, &data, output)?;
        }
    }

    Ok(())
}

fn open(dataset: &Dataset) -> (Arc<MemoryStore>, Arc<EntityRegistry>) {
    (Arc::new(dataset.store()), Arc::new(dataset.registry()))
}

fn context(
    store: &Arc<MemoryStore>,
    registry: &Arc<EntityRegistry>,
    as_jobs: bool,
) -> (ExecutionContext, Option<Arc<InProcessQueue>>) {
    let ctx = ExecutionContext::new(store.clone(), registry.clone());
    if !as_jobs {
        return (ctx, None);
    }
    let queue = Arc::new(InProcessQueue::new(store.clone(), registry.clone()));
    (ctx.with_queue(queue.clone()), Some(queue))
}

fn build_query(entity: &str, filters: &[String]) -> Result<SourceQuery, CliError> {
    let mut query = SourceQuery::new(entity);
    for raw in filters {
        let (field, value) = raw
            .split_once('=')
            .ok_or_else(|| CliError::InvalidFilter(raw.clone()))?;
        query = query.filter(field, parse_value(value));
    }
    Ok(query)
}

/// Interpret a CLI literal: bool, then integer, then string.
fn parse_value(raw: &str) -> Value {
    if let Ok(b) = raw.parse::<bool>() {
        return Value::Boolean(b);
    }
    if let Ok(n) = raw.parse::<i64>() {
        return Value::Int(n);
    }
    Value::String(raw.to_string())
}

fn parse_deadline(raw: Option<&str>) -> Result<Option<DateTime<Utc>>, CliError> {
    match raw {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|t| Some(t.with_timezone(&Utc)))
            .map_err(|_| CliError::InvalidTimestamp(raw.to_string())),
        None => Ok(None),
    }
}

fn print_summary(summary: &RunSummary) {
    println!("Batch run summary:");
    println!("-----------------------------");
    println!("{:<16} {}", "Rows examined", summary.examined);
    println!("{:<16} {}", "Rows dispatched", summary.dispatched);
    println!("{:<16} {:?}", "Termination", summary.termination);
}

fn write_back(
    mut dataset: Dataset,
    store: &MemoryStore,
    data: &str,
    output: Option<String>,
) -> Result<(), CliError> {
    dataset.absorb(store);
    dataset.save(output.as_deref().unwrap_or(data))
}
