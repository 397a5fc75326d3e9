use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Copy all rows matching a query to another entity
    Copy {
        #[arg(long, help = "Dataset file path")]
        data: String,

        #[arg(long, help = "Source entity name")]
        from: String,

        #[arg(long, help = "Destination entity name")]
        to: String,

        #[arg(long, help = "Equality filter, field=value; repeatable")]
        filter: Vec<String>,

        #[arg(long, default_value_t = 100, help = "Rows fetched per page")]
        page_size: i64,

        #[arg(long, default_value_t = 0, help = "Row ceiling, 0 = unlimited")]
        limit: i64,

        #[arg(long, help = "Hard-delete each source row after copying it")]
        delete_source: bool,

        #[arg(long, help = "RFC 3339 deadline after which no row starts processing")]
        process_before: Option<String>,

        #[arg(long, help = "Rows-per-minute ceiling for job dispatch")]
        rate: Option<i64>,

        #[arg(long, help = "Dispatch each row as a queued job instead of inline")]
        as_jobs: bool,

        #[arg(long, help = "Queue name for job routing")]
        queue: Option<String>,

        #[arg(long, help = "Write the mutated dataset here instead of in place")]
        output: Option<String>,
    },
    /// Delete all rows matching a query
    Delete {
        #[arg(long, help = "Dataset file path")]
        data: String,

        #[arg(long, help = "Source entity name")]
        from: String,

        #[arg(long, help = "Equality filter, field=value; repeatable")]
        filter: Vec<String>,

        #[arg(long, default_value_t = 100, help = "Rows fetched per page")]
        page_size: i64,

        #[arg(long, default_value_t = 0, help = "Row ceiling, 0 = unlimited")]
        limit: i64,

        #[arg(long, help = "RFC 3339 deadline after which no row starts processing")]
        process_before: Option<String>,

        #[arg(long, help = "Rows-per-minute ceiling for job dispatch")]
        rate: Option<i64>,

        #[arg(long, help = "Dispatch each row as a queued job instead of inline")]
        as_jobs: bool,

        #[arg(long, help = "Queue name for job routing")]
        queue: Option<String>,

        #[arg(long, help = "Write the mutated dataset here instead of in place")]
        output: Option<String>,
    },
    /// Copy an individual row to another entity
    CopyRow {
        #[arg(long, help = "Dataset file path")]
        data: String,

        #[arg(long, help = "Source entity name")]
        from: String,

        #[arg(long, help = "Primary key of the row")]
        key: String,

        #[arg(long, help = "Destination entity name")]
        to: String,

        #[arg(long, help = "Hard-delete the source row after copying it")]
        delete_source: bool,

        #[arg(long, help = "RFC 3339 deadline after which the copy becomes a no-op")]
        process_before: Option<String>,

        #[arg(long, help = "Write the mutated dataset here instead of in place")]
        output: Option<String>,
    },
    /// Delete an individual row
    DeleteRow {
        #[arg(long, help = "Dataset file path")]
        data: String,

        #[arg(long, help = "Source entity name")]
        from: String,

        #[arg(long, help = "Primary key of the row")]
        key: String,

        #[arg(long, help = "RFC 3339 deadline after which the delete becomes a no-op")]
        process_before: Option<String>,

        #[arg(long, help = "Write the mutated dataset here instead of in place")]
        output: Option<String>,
    },
}
