//! Scan window for a run.

use chrono::{DateTime, Duration, Utc};

use crate::event::EventTime;

/// Half-open time range `[from, to)` used for event queries.
#[derive(Debug, Clone, PartialEq)]
pub struct DateRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl DateRange {
    /// Window from now to `days` days ahead.
    pub fn upcoming(days: u32) -> Self {
        Self::upcoming_from(Utc::now(), days)
    }

    pub fn upcoming_from(now: DateTime<Utc>, days: u32) -> Self {
        DateRange {
            from: now,
            to: now
                .checked_add_signed(Duration::days(i64::from(days)))
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    /// Range spanning exactly one event's start and end.
    pub fn covering(start: &EventTime, end: &EventTime) -> Self {
        DateRange {
            from: start.to_utc(),
            to: end.to_utc(),
        }
    }

    pub fn from_rfc3339(&self) -> String {
        self.from.to_rfc3339()
    }

    pub fn to_rfc3339(&self) -> String {
        self.to.to_rfc3339()
    }
}
