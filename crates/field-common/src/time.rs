//! Acquisition date windows for imagery requests.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Number of days of imagery considered for a field-health map.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 30;

/// An inclusive range of whole UTC days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateWindow {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    /// The window ending on `now`'s date and starting `days` earlier.
    pub fn trailing(now: DateTime<Utc>, days: i64) -> Self {
        let to = now.date_naive();
        Self {
            from: to - Duration::days(days),
            to,
        }
    }

    /// Trailing 30-day window ending today.
    pub fn last_30_days() -> Self {
        Self::trailing(Utc::now(), DEFAULT_LOOKBACK_DAYS)
    }

    /// Start of the first day, e.g. `2024-01-01T00:00:00Z`.
    pub fn from_timestamp(&self) -> String {
        format!("{}T00:00:00Z", self.from.format("%Y-%m-%d"))
    }

    /// End of the last day, e.g. `2024-01-31T23:59:59Z`.
    pub fn to_timestamp(&self) -> String {
        format!("{}T23:59:59Z", self.to.format("%Y-%m-%d"))
    }
}
