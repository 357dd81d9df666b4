//! Rolling time windows.

use chrono::{DateTime, Duration, Utc};

/// Window lengths used by the stats reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeWindow {
    HalfHour,
    Hour,
    Week,
}

impl TimeWindow {
    pub fn duration(self) -> Duration {
        match self {
            TimeWindow::HalfHour => Duration::minutes(30),
            TimeWindow::Hour => Duration::hours(1),
            TimeWindow::Week => Duration::weeks(1),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeWindow::HalfHour => "last 30 minutes",
            TimeWindow::Hour => "last hour",
            TimeWindow::Week => "last week",
        }
    }

    /// Whether `timestamp` falls inside this window ending at `now`.
    pub fn contains(self, timestamp: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        is_within(timestamp, self.duration(), now)
    }
}

/// `now - timestamp <= window`, inclusive.
///
/// Only the lower edge is checked: timestamps after `now` always pass.
pub fn is_within(timestamp: DateTime<Utc>, window: Duration, now: DateTime<Utc>) -> bool {
    now.signed_duration_since(timestamp) <= window
}
