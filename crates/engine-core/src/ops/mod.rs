pub mod copy;
pub mod delete;

use chrono::{DateTime, Utc};

/// Expiry guard shared by the row operations: work whose `process_before`
/// already passed becomes a silent no-op rather than an error, which lets
/// long-delayed queued work self-cancel.
pub(crate) fn is_expired(process_before: Option<DateTime<Utc>>) -> bool {
    match process_before {
        Some(deadline) => deadline < Utc::now(),
        None => false,
    }
}
