use std::path::Path;

use anyhow::{Context, Result};
use busyblock_core::config::SyncConfig;
use busyblock_core::reconciler::{CalendarHandle, Reconciler};
use busyblock_core::sync_window::SyncWindow;
use chrono_tz::Tz;
use tracing::info;

pub async fn run(config_path: &Path) -> Result<()> {
    let config = SyncConfig::load(config_path, local_timezone())?;

    let source = config.source.remote();
    let destination = config.destination.remote();
    let window = SyncWindow::starting_now(config.lookahead_days);

    info!(
        source = %config.source.calendar_id,
        source_provider = source.name(),
        destination = %config.destination.calendar_id,
        destination_provider = destination.name(),
        from = %window.from_rfc3339(),
        to = %window.to_rfc3339(),
        mode = %config.settings.matching,
        "Starting sync"
    );

    let reconciler = Reconciler::new(
        CalendarHandle::new(&source, &config.source.calendar_id),
        CalendarHandle::new(&destination, &config.destination.calendar_id),
        &config.settings,
    );

    let report = reconciler.run(&window).await.context("Sync aborted")?;
    report.log();

    if report.is_noop() {
        info!("Destination calendar already up to date");
    }

    Ok(())
}

/// This machine's zone, or UTC if it can't be determined.
fn local_timezone() -> Tz {
    iana_time_zone::get_timezone()
        .ok()
        .and_then(|name| name.parse().ok())
        .unwrap_or(Tz::UTC)
}
