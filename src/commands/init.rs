use std::path::Path;

use anyhow::Result;
use busyblock_core::config::SyncConfig;

pub fn run(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at {}\n\
            Edit it directly, or use `busyblock init --force` to start over.",
            config_path.display()
        );
    }

    SyncConfig::create_default_config(config_path)?;

    println!("Created {}", config_path.display());
    println!("\nFill in the [source] and [destination] calendars, then run:");
    println!("  busyblock sync");

    Ok(())
}
