//! Lookahead window for a sync run.

use chrono::{DateTime, Duration, Utc};

use crate::event::CalendarEvent;

/// Half-open interval `[from, to)` covering the days a run looks at.
/// Rebuilt from the wall clock on every run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl SyncWindow {
    /// Window of `days` days starting at `from`.
    pub fn new(from: DateTime<Utc>, days: u32) -> Self {
        SyncWindow {
            from,
            to: from + Duration::days(i64::from(days)),
        }
    }

    /// Window of `days` days starting right now.
    pub fn starting_now(days: u32) -> Self {
        Self::new(Utc::now(), days)
    }

    /// Whether any part of the event falls inside the window.
    pub fn overlaps(&self, event: &CalendarEvent) -> bool {
        event.start_utc() < self.to && event.end_utc() > self.from
    }

    pub fn from_rfc3339(&self) -> String {
        self.from.to_rfc3339()
    }

    pub fn to_rfc3339(&self) -> String {
        self.to.to_rfc3339()
    }
}
