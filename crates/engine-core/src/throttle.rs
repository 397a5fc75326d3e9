//! Pure pacing arithmetic shared by the batch drivers: rate-based delay
//! scheduling, deadline comparison and row-limit enforcement.

use chrono::{DateTime, Duration, Utc};

/// Cumulative scheduling delay for the `count`-th row of a run (1-based),
/// given a rows-per-minute ceiling. Whole seconds, floored: rate 3 puts row 1
/// at +20s, row 2 at +40s; rate 100 puts rows 1..5 at +0s, +1s, +1s, +2s,
/// +3s. The floor is part of the contract.
pub fn delay_for_row(count: u64, rate: u32) -> Duration {
    let seconds = (60.0 / rate as f64 * count as f64).floor() as i64;
    Duration::seconds(seconds)
}

/// Target delivery instant for a delayed dispatch.
pub fn scheduled_at(started_at: DateTime<Utc>, delay: Duration) -> DateTime<Utc> {
    started_at + delay
}

/// Whether a scheduled delivery instant falls strictly after the deadline.
/// The comparison is against where the row would land, not wall-clock now.
pub fn has_exceeded_deadline(scheduled_at: DateTime<Utc>, deadline: DateTime<Utc>) -> bool {
    scheduled_at > deadline
}

/// Whether the row counter has crossed the configured ceiling. A limit of 0
/// means unlimited. Strictly greater than: the boundary row itself is still
/// processed, the next one is not.
pub fn has_reached_limit(processed: u64, limit: u64) -> bool {
    if limit == 0 {
        return false;
    }
    processed > limit
}
