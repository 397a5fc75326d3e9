use chrono::{DateTime, Utc};
use engine_core::error::ConfigError;
use model::query::SourceQuery;

/// Configuration of a batch copy run. Assembled via consuming builder
/// methods, validated once at `run()` entry, immutable afterwards.
#[derive(Debug, Clone)]
pub struct BatchCopyConfig {
    pub query: SourceQuery,
    pub to_entity: String,
    pub page_size: i64,
    pub limit: i64,
    pub delete_source: bool,
    pub process_before: Option<DateTime<Utc>>,
    pub rate: Option<i64>,
    pub as_jobs: bool,
    pub queue: Option<String>,
}

impl BatchCopyConfig {
    pub fn new(query: SourceQuery, to_entity: &str) -> Self {
        BatchCopyConfig {
            query,
            to_entity: to_entity.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            limit: 0,
            delete_source: false,
            process_before: None,
            rate: None,
            as_jobs: false,
            queue: None,
        }
    }

    pub fn page_size(mut self, page_size: i64) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    pub fn delete_source(mut self) -> Self {
        self.delete_source = true;
        self
    }

    pub fn process_before(mut self, deadline: DateTime<Utc>) -> Self {
        self.process_before = Some(deadline);
        self
    }

    pub fn rate(mut self, rows_per_minute: i64) -> Self {
        self.rate = Some(rows_per_minute);
        self
    }

    pub fn as_jobs(mut self) -> Self {
        self.as_jobs = true;
        self
    }

    pub fn on_queue(mut self, queue: &str) -> Self {
        self.queue = Some(queue.to_string());
        self
    }
}

/// Configuration of a batch delete run; copy minus the destination concerns.
#[derive(Debug, Clone)]
pub struct BatchDeleteConfig {
    pub query: SourceQuery,
    pub page_size: i64,
    pub limit: i64,
    pub process_before: Option<DateTime<Utc>>,
    pub rate: Option<i64>,
    pub as_jobs: bool,
    pub queue: Option<String>,
}

impl BatchDeleteConfig {
    pub fn new(query: SourceQuery) -> Self {
        BatchDeleteConfig {
            query,
            page_size: DEFAULT_PAGE_SIZE,
            limit: 0,
            process_before: None,
            rate: None,
            as_jobs: false,
            queue: None,
        }
    }

    pub fn page_size(mut self, page_size: i64) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    pub fn process_before(mut self, deadline: DateTime<Utc>) -> Self {
        self.process_before = Some(deadline);
        self
    }

    pub fn rate(mut self, rows_per_minute: i64) -> Self {
        self.rate = Some(rows_per_minute);
        self
    }

    pub fn as_jobs(mut self) -> Self {
        self.as_jobs = true;
        self
    }

    pub fn on_queue(mut self, queue: &str) -> Self {
        self.queue = Some(queue.to_string());
        self
    }
}

pub const DEFAULT_PAGE_SIZE: i64 = 100;

/// Normalized pacing parameters produced by validation.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Pacing {
    pub page_size: u64,
    pub limit: u64,
    pub rate: Option<u32>,
}

/// Checks the shared numeric invariants and normalizes them. Any violation
/// rejects the run before a single row is read.
pub(crate) fn validate_pacing(
    page_size: i64,
    limit: i64,
    rate: Option<i64>,
    as_jobs: bool,
    has_queue: bool,
) -> Result<Pacing, ConfigError> {
    if page_size <= 1 {
        return Err(ConfigError::InvalidPageSize(page_size));
    }
    if limit < 0 {
        return Err(ConfigError::InvalidLimit(limit));
    }
    let rate = match rate {
        Some(r) if r <= 0 => return Err(ConfigError::InvalidRate(r)),
        Some(r) => Some(r as u32),
        None => None,
    };
    if as_jobs && !has_queue {
        return Err(ConfigError::QueueRequired);
    }

    Ok(Pacing {
        page_size: page_size as u64,
        limit: limit as u64,
        rate,
    })
}
