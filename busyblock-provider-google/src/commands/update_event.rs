use anyhow::{Context, Result};
use busyblock_core::protocol::UpdateEvent;
use google_calendar::types::SendUpdates;

use crate::google_event::apply_patch;
use crate::remote_config::GoogleRemoteConfig;
use crate::session::Session;

pub async fn handle(cmd: UpdateEvent) -> Result<()> {
    let config = GoogleRemoteConfig::try_from(&cmd.remote_config)?;

    let client = Session::load_valid(&config.google_account).await?.client()?;

    let mut google_event = client
        .events()
        .get(&cmd.calendar_id, &cmd.event_id, 0, "")
        .await
        .with_context(|| format!("Failed to fetch event: {}", cmd.event_id))?
        .body;

    apply_patch(&mut google_event, &cmd.patch);

    client
        .events()
        .update(
            &cmd.calendar_id,
            &cmd.event_id,
            0,
            0,
            false,
            SendUpdates::None,
            false,
            &google_event,
        )
        .await
        .with_context(|| format!("Failed to update event: {}", cmd.event_id))?;

    Ok(())
}
