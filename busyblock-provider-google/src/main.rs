//! busyblock-provider-google - Google Calendar provider for busyblock
//!
//! This binary implements the busyblock provider protocol, communicating
//! with busyblock via JSON over stdin/stdout.
//!
//! The provider manages its own credentials and tokens:
//!   ~/.config/busyblock/providers/google/app_config.toml
//!   ~/.config/busyblock/providers/google/session/{account}.toml

mod app_config;
mod commands;
mod google_event;
mod remote_config;
mod session;

use anyhow::Result;
use busyblock_core::protocol::{Command, Request, Response};
use serde::{Serialize, de::DeserializeOwned};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

#[tokio::main]
async fn main() -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        // Skip empty lines
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Request>(&line) {
            Ok(request) => handle_request(request).await,
            Err(e) => Response::<()>::error(&format!("Failed to parse request: {}", e)),
        };

        stdout.write_all(response.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    Ok(())
}

async fn handle_request(request: Request) -> String {
    let params = request.params;

    match request.command {
        Command::Authenticate => respond(commands::authenticate::handle().await),
        Command::ListEvents => match parse(params) {
            Ok(cmd) => respond(commands::list_events::handle(cmd).await),
            Err(e) => e,
        },
        Command::CreateEvent => match parse(params) {
            Ok(cmd) => respond(commands::create_event::handle(cmd).await),
            Err(e) => e,
        },
        Command::UpdateEvent => match parse(params) {
            Ok(cmd) => respond(commands::update_event::handle(cmd).await),
            Err(e) => e,
        },
        Command::DeleteEvent => match parse(params) {
            Ok(cmd) => respond(commands::delete_event::handle(cmd).await),
            Err(e) => e,
        },
    }
}

/// Deserialize command params, or the error response to send back.
fn parse<C: DeserializeOwned>(params: serde_json::Value) -> Result<C, String> {
    serde_json::from_value(params)
        .map_err(|e| Response::<()>::error(&format!("Invalid params: {}", e)))
}

fn respond<T: Serialize>(result: Result<T>) -> String {
    match result {
        Ok(data) => Response::success(data),
        Err(e) => Response::<()>::error(&format!("{:#}", e)),
    }
}
