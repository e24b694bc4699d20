//! Capability interface the reconciler uses to read and write calendars.

use async_trait::async_trait;

use crate::error::BusyBlockResult;
use crate::event::{CalendarEvent, EventPatch, NewEvent};
use crate::sync_window::SyncWindow;

#[async_trait]
pub trait CalendarProvider: Send + Sync {
    /// Events of `calendar_id` overlapping the window, in provider order.
    async fn list_events(
        &self,
        calendar_id: &str,
        window: &SyncWindow,
    ) -> BusyBlockResult<Vec<CalendarEvent>>;

    /// Create an event and return it with its provider-assigned id.
    async fn create_event(
        &self,
        calendar_id: &str,
        event: &NewEvent,
    ) -> BusyBlockResult<CalendarEvent>;

    async fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        patch: &EventPatch,
    ) -> BusyBlockResult<()>;

    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> BusyBlockResult<()>;
}
