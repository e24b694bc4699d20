//! JSON protocol spoken between busyblock and provider binaries
//! over stdin/stdout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::event::{CalendarEvent, EventPatch, NewEvent};

pub trait ProviderCommand: Serialize {
    type Response: DeserializeOwned;
    fn command() -> Command;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Authenticate,
    ListEvents,
    CreateEvent,
    UpdateEvent,
    DeleteEvent,
}

/// Request sent from busyblock to a provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct Request {
    pub command: Command,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Response sent from a provider back to busyblock.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response<T> {
    Success { data: T },
    Error { error: String },
}

impl<T: Serialize> Response<T> {
    pub fn success(data: T) -> String {
        serde_json::to_string(&Response::Success { data }).unwrap_or_else(|e| {
            Response::<()>::error(&format!("Failed to serialize response: {e}"))
        })
    }
}

impl Response<()> {
    pub fn error(msg: &str) -> String {
        // A map with one string entry always serializes
        serde_json::json!({ "status": "error", "error": msg }).to_string()
    }
}

/// Run the provider's interactive authentication.
/// Responds with the account identifier (e.g. an email address).
#[derive(Debug, Serialize, Deserialize)]
pub struct Authenticate {}

impl ProviderCommand for Authenticate {
    type Response = String;
    fn command() -> Command {
        Command::Authenticate
    }
}

/// List events overlapping `[from, to)`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListEvents {
    /// Provider-specific params from the calendar config (e.g. google_account)
    #[serde(flatten)]
    pub remote_config: serde_json::Map<String, serde_json::Value>,
    pub calendar_id: String,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl ProviderCommand for ListEvents {
    type Response = Vec<CalendarEvent>;
    fn command() -> Command {
        Command::ListEvents
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateEvent {
    #[serde(flatten)]
    pub remote_config: serde_json::Map<String, serde_json::Value>,
    pub calendar_id: String,
    pub event: NewEvent,
}

impl ProviderCommand for CreateEvent {
    type Response = CalendarEvent;
    fn command() -> Command {
        Command::CreateEvent
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateEvent {
    #[serde(flatten)]
    pub remote_config: serde_json::Map<String, serde_json::Value>,
    pub calendar_id: String,
    pub event_id: String,
    pub patch: EventPatch,
}

impl ProviderCommand for UpdateEvent {
    type Response = ();
    fn command() -> Command {
        Command::UpdateEvent
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteEvent {
    #[serde(flatten)]
    pub remote_config: serde_json::Map<String, serde_json::Value>,
    pub calendar_id: String,
    pub event_id: String,
}

impl ProviderCommand for DeleteEvent {
    type Response = ();
    fn command() -> Command {
        Command::DeleteEvent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_request_params_flatten_remote_config() {
        let mut remote_config = serde_json::Map::new();
        remote_config.insert("google_account".into(), "me@example.com".into());

        let cmd = ListEvents {
            remote_config,
            calendar_id: "primary".to_string(),
            from: Utc.with_ymd_and_hms(2025, 3, 17, 0, 0, 0).unwrap(),
            to: Utc.with_ymd_and_hms(2025, 3, 20, 0, 0, 0).unwrap(),
        };
        let request = Request {
            command: ListEvents::command(),
            params: serde_json::to_value(&cmd).unwrap(),
        };
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["command"], "list_events");
        assert_eq!(json["params"]["google_account"], "me@example.com");
        assert_eq!(json["params"]["calendar_id"], "primary");

        let parsed: ListEvents = serde_json::from_value(json["params"].clone()).unwrap();
        assert_eq!(parsed.calendar_id, "primary");
        assert_eq!(parsed.remote_config.len(), 1);
    }

    #[test]
    fn test_response_wire_format() {
        let ok: Response<Vec<String>> =
            serde_json::from_str(&Response::success(vec!["a".to_string()])).unwrap();
        assert!(matches!(ok, Response::Success { data } if data == vec!["a".to_string()]));

        let err: Response<()> = serde_json::from_str(&Response::error("rate limited")).unwrap();
        assert!(matches!(err, Response::Error { error } if error == "rate limited"));
    }

    #[test]
    fn test_unit_response_accepts_null_data() {
        let parsed: Response<()> =
            serde_json::from_str(r#"{"status":"success","data":null}"#).unwrap();
        assert!(matches!(parsed, Response::Success { .. }));
    }
}
