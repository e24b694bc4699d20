//! Provider-neutral event types.
//!
//! Providers convert their API responses into `CalendarEvent`, and the
//! reconciler only ever reads those. Writes go the other way as explicit
//! commands (`NewEvent`, `EventPatch`).

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// A calendar event as listed by a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub start: EventTime,
    pub end: EventTime,
    #[serde(default)]
    pub guests: Vec<Guest>,
    /// Provider color tag (Google uses "1".."11")
    #[serde(default)]
    pub color_id: Option<String>,
}

/// An event guest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guest {
    pub name: Option<String>,
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventTime {
    DateTime(DateTime<Utc>),
    /// All-day events carry a date with no time of day
    Date(NaiveDate),
}

impl EventTime {
    /// UTC instant, or midnight UTC for all-day dates.
    pub fn to_utc(&self) -> DateTime<Utc> {
        match self {
            EventTime::DateTime(dt) => *dt,
            EventTime::Date(d) => d.and_time(chrono::NaiveTime::MIN).and_utc(),
        }
    }

    pub fn is_date(&self) -> bool {
        matches!(self, EventTime::Date(_))
    }
}

impl std::fmt::Display for EventTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventTime::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M UTC")),
            EventTime::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl CalendarEvent {
    /// True for date-based events, single or multi-day.
    pub fn is_all_day(&self) -> bool {
        self.start.is_date() || self.end.is_date()
    }

    pub fn start_utc(&self) -> DateTime<Utc> {
        self.start.to_utc()
    }

    pub fn end_utc(&self) -> DateTime<Utc> {
        self.end.to_utc()
    }

    pub fn local_start(&self, tz: &Tz) -> DateTime<Tz> {
        self.start_utc().with_timezone(tz)
    }

    pub fn local_end(&self, tz: &Tz) -> DateTime<Tz> {
        self.end_utc().with_timezone(tz)
    }

    /// Same start and same end, compared exactly.
    pub fn same_span(&self, other: &CalendarEvent) -> bool {
        self.start == other.start && self.end == other.end
    }
}

impl std::fmt::Display for CalendarEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({} - {})", self.title, self.start, self.end)
    }
}

/// Command to create an event on a calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEvent {
    pub title: String,
    pub start: EventTime,
    pub end: EventTime,
    pub description: Option<String>,
    pub color_id: Option<String>,
    /// When false the provider must create the event without any reminders
    pub use_default_reminders: bool,
}

/// Command to change fields of an existing event. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl EventPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }
}
