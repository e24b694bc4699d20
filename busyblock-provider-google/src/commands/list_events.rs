use anyhow::{Context, Result};
use busyblock_core::event::CalendarEvent;
use busyblock_core::protocol::ListEvents;
use google_calendar::types::OrderBy;

use crate::google_event::FromGoogle;
use crate::remote_config::GoogleRemoteConfig;
use crate::session::Session;

pub async fn handle(cmd: ListEvents) -> Result<Vec<CalendarEvent>> {
    let config = GoogleRemoteConfig::try_from(&cmd.remote_config)?;
    let time_min = cmd.from.to_rfc3339();
    let time_max = cmd.to.to_rfc3339();

    let client = Session::load_valid(&config.google_account).await?.client()?;

    let response = client
        .events()
        .list_all(
            &cmd.calendar_id,
            "",
            0,
            OrderBy::StartTime,
            &[],
            "", // search query
            &[],
            false,
            false,
            true, // expand recurring events into instances
            &time_max,
            &time_min,
            "",
            "",
        )
        .await
        .with_context(|| format!("Failed to fetch events from {}", cmd.calendar_id))?;

    response
        .body
        .into_iter()
        .filter(|event| event.status != "cancelled")
        .map(CalendarEvent::from_google)
        .collect()
}
