//! In-memory provider for reconciler tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::error::{BusyBlockError, BusyBlockResult};
use crate::event::{CalendarEvent, EventPatch, EventTime, NewEvent};
use crate::provider::CalendarProvider;
use crate::sync_window::SyncWindow;

#[derive(Debug, Clone, PartialEq)]
pub enum Write {
    Create { calendar_id: String, event: NewEvent },
    Update { calendar_id: String, event_id: String, patch: EventPatch },
    Delete { calendar_id: String, event_id: String },
}

impl Write {
    pub fn calendar_id(&self) -> &str {
        match self {
            Write::Create { calendar_id, .. }
            | Write::Update { calendar_id, .. }
            | Write::Delete { calendar_id, .. } => calendar_id,
        }
    }
}

#[derive(Default)]
struct State {
    calendars: HashMap<String, Vec<CalendarEvent>>,
    writes: Vec<Write>,
    next_id: usize,
    fail_writes_after: Option<usize>,
}

/// Calendars held in memory. Every write is recorded.
#[derive(Default)]
pub struct MemoryProvider {
    state: Mutex<State>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, calendar_id: &str, event: CalendarEvent) {
        let mut state = self.state.lock().unwrap();
        state.calendars.entry(calendar_id.to_string()).or_default().push(event);
    }

    pub fn remove(&self, calendar_id: &str, event_id: &str) {
        let mut state = self.state.lock().unwrap();
        if let Some(events) = state.calendars.get_mut(calendar_id) {
            events.retain(|e| e.id != event_id);
        }
    }

    pub fn events(&self, calendar_id: &str) -> Vec<CalendarEvent> {
        let state = self.state.lock().unwrap();
        state.calendars.get(calendar_id).cloned().unwrap_or_default()
    }

    pub fn writes(&self) -> Vec<Write> {
        self.state.lock().unwrap().writes.clone()
    }

    pub fn clear_writes(&self) {
        self.state.lock().unwrap().writes.clear();
    }

    /// Let `n` more writes succeed, then fail every following one.
    pub fn fail_writes_after(&self, n: usize) {
        self.state.lock().unwrap().fail_writes_after = Some(n);
    }

    fn record(state: &mut State, write: Write) -> BusyBlockResult<()> {
        if let Some(remaining) = state.fail_writes_after.as_mut() {
            if *remaining == 0 {
                return Err(BusyBlockError::Provider("429 Rate Limit Exceeded".into()));
            }
            *remaining -= 1;
        }
        state.writes.push(write);
        Ok(())
    }
}

#[async_trait]
impl CalendarProvider for MemoryProvider {
    async fn list_events(
        &self,
        calendar_id: &str,
        window: &SyncWindow,
    ) -> BusyBlockResult<Vec<CalendarEvent>> {
        let state = self.state.lock().unwrap();
        let events = state.calendars.get(calendar_id).ok_or_else(|| {
            BusyBlockError::Provider(format!("404 Not Found: calendar {calendar_id}"))
        })?;
        Ok(events.iter().filter(|e| window.overlaps(e)).cloned().collect())
    }

    async fn create_event(
        &self,
        calendar_id: &str,
        event: &NewEvent,
    ) -> BusyBlockResult<CalendarEvent> {
        let mut state = self.state.lock().unwrap();
        Self::record(
            &mut state,
            Write::Create {
                calendar_id: calendar_id.to_string(),
                event: event.clone(),
            },
        )?;

        state.next_id += 1;
        let created = CalendarEvent {
            id: format!("created-{}", state.next_id),
            title: event.title.clone(),
            description: event.description.clone(),
            start: event.start,
            end: event.end,
            guests: vec![],
            color_id: event.color_id.clone(),
        };
        state
            .calendars
            .entry(calendar_id.to_string())
            .or_default()
            .push(created.clone());
        Ok(created)
    }

    async fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        patch: &EventPatch,
    ) -> BusyBlockResult<()> {
        let mut state = self.state.lock().unwrap();
        Self::record(
            &mut state,
            Write::Update {
                calendar_id: calendar_id.to_string(),
                event_id: event_id.to_string(),
                patch: patch.clone(),
            },
        )?;

        let event = state
            .calendars
            .get_mut(calendar_id)
            .and_then(|events| events.iter_mut().find(|e| e.id == event_id))
            .ok_or_else(|| BusyBlockError::Provider(format!("404 Not Found: {event_id}")))?;
        if let Some(title) = &patch.title {
            event.title = title.clone();
        }
        if let Some(description) = &patch.description {
            event.description = Some(description.clone());
        }
        Ok(())
    }

    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> BusyBlockResult<()> {
        let mut state = self.state.lock().unwrap();
        Self::record(
            &mut state,
            Write::Delete {
                calendar_id: calendar_id.to_string(),
                event_id: event_id.to_string(),
            },
        )?;

        if let Some(events) = state.calendars.get_mut(calendar_id) {
            events.retain(|e| e.id != event_id);
        }
        Ok(())
    }
}

/// Monday 2025-03-17 00:00 UTC.
pub fn monday() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 17, 0, 0, 0).unwrap()
}

/// Timed event on `day` days after `monday()`, from `start` to `end` (hour, minute).
pub fn timed_event(
    id: &str,
    title: &str,
    day: i64,
    start: (i64, i64),
    end: (i64, i64),
) -> CalendarEvent {
    let base = monday() + Duration::days(day);
    CalendarEvent {
        id: id.to_string(),
        title: title.to_string(),
        description: None,
        start: EventTime::DateTime(base + Duration::hours(start.0) + Duration::minutes(start.1)),
        end: EventTime::DateTime(base + Duration::hours(end.0) + Duration::minutes(end.1)),
        guests: vec![],
        color_id: None,
    }
}

/// All-day event on `day` days after `monday()`.
pub fn all_day_event(id: &str, title: &str, day: i64) -> CalendarEvent {
    let date = (monday() + Duration::days(day)).date_naive();
    CalendarEvent {
        id: id.to_string(),
        title: title.to_string(),
        description: None,
        start: EventTime::Date(date),
        end: EventTime::Date(date + Duration::days(1)),
        guests: vec![],
        color_id: None,
    }
}
