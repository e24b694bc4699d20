use anyhow::{Context, Result};
use busyblock_core::protocol::DeleteEvent;
use google_calendar::types::SendUpdates;

use crate::remote_config::GoogleRemoteConfig;
use crate::session::Session;

pub async fn handle(cmd: DeleteEvent) -> Result<()> {
    let config = GoogleRemoteConfig::try_from(&cmd.remote_config)?;

    let client = Session::load_valid(&config.google_account).await?.client()?;

    let result = client
        .events()
        .delete(&cmd.calendar_id, &cmd.event_id, false, SendUpdates::None)
        .await;

    match result {
        Ok(_) => Ok(()),
        // Already gone
        Err(e) if is_gone(&e.to_string()) => Ok(()),
        Err(e) => Err(e).with_context(|| format!("Failed to delete event: {}", cmd.event_id)),
    }
}

fn is_gone(error: &str) -> bool {
    error.contains("410") || error.contains("Gone")
}
