mod commands;

use anyhow::Result;
use busyblock_core::config::SyncConfig;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "busyblock")]
#[command(about = "Mirror one calendar's events onto another as Busy placeholders")]
struct Cli {
    /// Config file (defaults to ~/.config/busyblock/config.toml)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one sync pass (meant to be triggered by cron or a timer)
    Sync,
    /// Write a starter config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
    /// Authenticate with a calendar provider
    Auth {
        /// Provider to authenticate with (e.g., "google")
        provider: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config_path = SyncConfig::resolve_path(cli.config.as_deref())?;

    match cli.command {
        Commands::Sync => commands::sync::run(&config_path).await,
        Commands::Init { force } => commands::init::run(&config_path, force),
        Commands::Auth { provider } => commands::auth::run(&provider).await,
    }
}

/// Log to stderr, `info` unless RUST_LOG says otherwise.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
