//! Provider subprocess client.
//!
//! Concrete calendar backends live in external binaries named
//! `busyblock-provider-{name}` (e.g. `busyblock-provider-google`). Each call
//! spawns the binary, writes one JSON request line to its stdin and reads
//! one JSON response from its stdout.
//!
//! Providers manage their own credentials. busyblock only forwards the
//! provider-specific params from the calendar config.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::io::AsyncWriteExt;
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;

use crate::error::{BusyBlockError, BusyBlockResult};
use crate::event::{CalendarEvent, EventPatch, NewEvent};
use crate::protocol::{
    Authenticate, Command, CreateEvent, DeleteEvent, ListEvents, ProviderCommand, Request,
    Response, UpdateEvent,
};
use crate::provider::CalendarProvider;
use crate::sync_window::SyncWindow;

const PROVIDER_TIMEOUT: Duration = Duration::from_secs(30);
/// Authentication waits on the user finishing a browser flow.
const AUTH_TIMEOUT: Duration = Duration::from_secs(300);

/// A provider binary plus the params identifying one account on it.
#[derive(Clone, Debug)]
pub struct RemoteProvider {
    name: String,
    remote_config: serde_json::Map<String, serde_json::Value>,
}

impl RemoteProvider {
    pub fn new(name: &str, remote_config: serde_json::Map<String, serde_json::Value>) -> Self {
        RemoteProvider {
            name: name.to_string(),
            remote_config,
        }
    }

    pub fn from_name(name: &str) -> Self {
        Self::new(name, serde_json::Map::new())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn binary_name(&self) -> String {
        format!("busyblock-provider-{}", self.name)
    }

    fn binary_path(&self) -> BusyBlockResult<std::path::PathBuf> {
        let binary_name = self.binary_name();
        which::which(&binary_name).map_err(|_| {
            BusyBlockError::ProviderNotInstalled(format!(
                "{}. Install it with:\n  cargo install {}",
                binary_name, binary_name
            ))
        })
    }

    /// Run the provider's interactive authentication and return the account identifier.
    pub async fn authenticate(&self) -> BusyBlockResult<String> {
        self.call_with_timeout(Authenticate {}, AUTH_TIMEOUT).await
    }

    /// Call a typed provider command and return its typed response.
    pub async fn call<C: ProviderCommand>(&self, cmd: C) -> BusyBlockResult<C::Response> {
        self.call_with_timeout(cmd, PROVIDER_TIMEOUT).await
    }

    async fn call_with_timeout<C: ProviderCommand>(
        &self,
        cmd: C,
        limit: Duration,
    ) -> BusyBlockResult<C::Response> {
        timeout(limit, self.call_raw(C::command(), cmd))
            .await
            .map_err(|_| BusyBlockError::ProviderTimeout(limit.as_secs()))?
    }

    /// Send a command with params and deserialize the response.
    async fn call_raw<P: Serialize, R: DeserializeOwned>(
        &self,
        command: Command,
        params: P,
    ) -> BusyBlockResult<R> {
        let params = serde_json::to_value(params)
            .map_err(|e| BusyBlockError::Serialization(e.to_string()))?;
        let request = Request { command, params };
        let request_json = serde_json::to_string(&request)
            .map_err(|e| BusyBlockError::Serialization(e.to_string()))?;

        let binary_path = self.binary_path()?;

        let mut child = TokioCommand::new(&binary_path)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                BusyBlockError::Provider(format!(
                    "Failed to spawn {}: {}",
                    binary_path.display(),
                    e
                ))
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| BusyBlockError::Provider("Provider stdin unavailable".into()))?;
        stdin
            .write_all(format!("{request_json}\n").as_bytes())
            .await?;
        drop(stdin);

        let output = child.wait_with_output().await?;

        if !output.status.success() {
            return Err(BusyBlockError::Provider(format!(
                "{} exited with status: {}",
                self.binary_name(),
                output.status.code().unwrap_or(-1)
            )));
        }

        parse_response(&String::from_utf8_lossy(&output.stdout))
    }

    fn remote_config(&self) -> serde_json::Map<String, serde_json::Value> {
        self.remote_config.clone()
    }
}

/// Decode a provider's stdout into its payload or its reported error.
fn parse_response<R: DeserializeOwned>(stdout: &str) -> BusyBlockResult<R> {
    let line = stdout.lines().find(|l| !l.trim().is_empty()).ok_or_else(|| {
        BusyBlockError::Provider("Provider returned no response".into())
    })?;

    let response: Response<R> = serde_json::from_str(line)
        .map_err(|e| BusyBlockError::Provider(format!("Failed to parse response: {}", e)))?;

    match response {
        Response::Success { data } => Ok(data),
        Response::Error { error } => Err(BusyBlockError::Provider(error)),
    }
}

#[async_trait]
impl CalendarProvider for RemoteProvider {
    async fn list_events(
        &self,
        calendar_id: &str,
        window: &SyncWindow,
    ) -> BusyBlockResult<Vec<CalendarEvent>> {
        self.call(ListEvents {
            remote_config: self.remote_config(),
            calendar_id: calendar_id.to_string(),
            from: window.from,
            to: window.to,
        })
        .await
    }

    async fn create_event(
        &self,
        calendar_id: &str,
        event: &NewEvent,
    ) -> BusyBlockResult<CalendarEvent> {
        self.call(CreateEvent {
            remote_config: self.remote_config(),
            calendar_id: calendar_id.to_string(),
            event: event.clone(),
        })
        .await
    }

    async fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        patch: &EventPatch,
    ) -> BusyBlockResult<()> {
        self.call(UpdateEvent {
            remote_config: self.remote_config(),
            calendar_id: calendar_id.to_string(),
            event_id: event_id.to_string(),
            patch: patch.clone(),
        })
        .await
    }

    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> BusyBlockResult<()> {
        self.call(DeleteEvent {
            remote_config: self.remote_config(),
            calendar_id: calendar_id.to_string(),
            event_id: event_id.to_string(),
        })
        .await
    }
}
