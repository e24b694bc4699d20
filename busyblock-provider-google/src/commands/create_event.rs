use anyhow::{Context, Result};
use busyblock_core::event::CalendarEvent;
use busyblock_core::protocol::CreateEvent;
use google_calendar::types::SendUpdates;

use crate::google_event::{FromGoogle, ToGoogle};
use crate::remote_config::GoogleRemoteConfig;
use crate::session::Session;

pub async fn handle(cmd: CreateEvent) -> Result<CalendarEvent> {
    let config = GoogleRemoteConfig::try_from(&cmd.remote_config)?;

    let client = Session::load_valid(&config.google_account).await?.client()?;

    let google_event = cmd.event.to_google();

    let response = client
        .events()
        .insert(
            &cmd.calendar_id,
            0,
            0,
            false,
            SendUpdates::None,
            false,
            &google_event,
        )
        .await
        .with_context(|| format!("Failed to create event: {}", &google_event.summary))?;

    CalendarEvent::from_google(response.body)
}
