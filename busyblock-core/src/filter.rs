//! Eligibility rules for mirroring a source event.

use chrono::{Datelike, Timelike, Weekday};
use chrono_tz::Tz;

use crate::event::CalendarEvent;

/// Why a source event is not mirrored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    AllDay,
    EndsTooEarly { end_hour: u32 },
    StartsTooLate { start_hour: u32 },
    Weekend(Weekday),
}

impl std::fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IgnoreReason::AllDay => write!(f, "all-day event"),
            IgnoreReason::EndsTooEarly { end_hour } => write!(f, "ends at hour {end_hour}"),
            IgnoreReason::StartsTooLate { start_hour } => {
                write!(f, "starts at hour {start_hour}")
            }
            IgnoreReason::Weekend(day) => write!(f, "falls on {day}"),
        }
    }
}

/// Hour and weekday bounds, evaluated in `timezone`.
#[derive(Debug, Clone)]
pub struct EligibilityFilter {
    /// Events whose end hour is at or before this are ignored
    pub ignore_before_hour: u32,
    /// Events whose start hour is at or after this are ignored
    pub ignore_after_hour: u32,
    pub ignore_weekends: bool,
    pub timezone: Tz,
}

impl EligibilityFilter {
    /// The first rule that excludes `event`, or `None` if it should be mirrored.
    pub fn should_ignore(&self, event: &CalendarEvent) -> Option<IgnoreReason> {
        if event.is_all_day() {
            return Some(IgnoreReason::AllDay);
        }

        let end_hour = event.local_end(&self.timezone).hour();
        if end_hour <= self.ignore_before_hour {
            return Some(IgnoreReason::EndsTooEarly { end_hour });
        }

        let start = event.local_start(&self.timezone);
        if start.hour() >= self.ignore_after_hour {
            return Some(IgnoreReason::StartsTooLate {
                start_hour: start.hour(),
            });
        }

        if self.ignore_weekends && matches!(start.weekday(), Weekday::Sat | Weekday::Sun) {
            return Some(IgnoreReason::Weekend(start.weekday()));
        }

        None
    }

    #[cfg(test)]
    pub fn is_eligible(&self, event: &CalendarEvent) -> bool {
        self.should_ignore(event).is_none()
    }
}
