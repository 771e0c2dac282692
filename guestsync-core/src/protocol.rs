//! Defines the JSON protocol used for communication between guestsync
//! and provider binaries over stdin/stdout.
//!
//! One request per line in, one response per line out. Every command
//! carries the account whose credentials to use and the calendar to act on.

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::event::{Event, GuestStatus, NewEvent};

pub trait ProviderCommand: Serialize {
    type Response: DeserializeOwned;
    fn command() -> Command;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Authenticate,
    ListEvents,
    GetEvent,
    AddGuest,
    SetMyStatus,
    CreateEvent,
    SetDescription,
    DeleteEvent,
}

/// Request sent from guestsync to a provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct Request {
    pub command: Command,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Response sent from a provider back to guestsync.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response<T> {
    Success { data: T },
    Error { error: String },
}

impl<T: Serialize> Response<T> {
    pub fn success(data: T) -> String {
        serde_json::to_string(&Response::Success { data })
            .unwrap_or_else(|e| Response::<()>::error(&format!("Failed to serialize response: {e}")))
    }
}

impl Response<()> {
    pub fn error(msg: &str) -> String {
        serde_json::json!({ "status": "error", "error": msg }).to_string()
    }
}

/// Which account and calendar a command applies to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub account: String,
    pub calendar_id: String,
}

/// Run the provider's interactive sign-in. Responds with the account identifier.
#[derive(Debug, Serialize, Deserialize)]
pub struct Authenticate {}

impl ProviderCommand for Authenticate {
    type Response = String;
    fn command() -> Command {
        Command::Authenticate
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListEvents {
    #[serde(flatten)]
    pub target: Target,
    /// RFC 3339 lower bound (event end after this)
    pub from: String,
    /// RFC 3339 upper bound (event start before this)
    pub to: String,
}

impl ProviderCommand for ListEvents {
    type Response = Vec<Event>;
    fn command() -> Command {
        Command::ListEvents
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GetEvent {
    #[serde(flatten)]
    pub target: Target,
    pub event_id: String,
}

impl ProviderCommand for GetEvent {
    type Response = Option<Event>;
    fn command() -> Command {
        Command::GetEvent
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddGuest {
    #[serde(flatten)]
    pub target: Target,
    pub event_id: String,
    pub identity: String,
}

impl ProviderCommand for AddGuest {
    type Response = ();
    fn command() -> Command {
        Command::AddGuest
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SetMyStatus {
    #[serde(flatten)]
    pub target: Target,
    pub event_id: String,
    pub status: GuestStatus,
}

impl ProviderCommand for SetMyStatus {
    type Response = ();
    fn command() -> Command {
        Command::SetMyStatus
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateEvent {
    #[serde(flatten)]
    pub target: Target,
    pub event: NewEvent,
}

impl ProviderCommand for CreateEvent {
    type Response = Event;
    fn command() -> Command {
        Command::CreateEvent
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SetDescription {
    #[serde(flatten)]
    pub target: Target,
    pub event_id: String,
    pub description: String,
}

impl ProviderCommand for SetDescription {
    type Response = ();
    fn command() -> Command {
        Command::SetDescription
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteEvent {
    #[serde(flatten)]
    pub target: Target,
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

    #[test]
    fn test_request_wire_format() {
        let params = serde_json::to_value(AddGuest {
            target: Target {
                account: "source@example.com".into(),
                calendar_id: "source@example.com".into(),
            },
            event_id: "abc".into(),
            identity: "guest@example.net".into(),
        })
        .unwrap();
        let request = Request {
            command: AddGuest::command(),
            params,
        };

        let json: serde_json::Value = serde_json::to_value(&request).unwrap();
        assert_eq!(json["command"], "add_guest");
        assert_eq!(json["params"]["calendar_id"], "source@example.com");
        assert_eq!(json["params"]["identity"], "guest@example.net");
    }

    #[test]
    fn test_unit_success_response_parses() {
        let line = Response::success(());
        let parsed: Response<()> = serde_json::from_str(&line).unwrap();
        assert!(matches!(parsed, Response::Success { .. }));
    }

    #[test]
    fn test_error_response_parses_for_any_type() {
        let line = Response::<()>::error("quota exceeded");
        let parsed: Response<Vec<Event>> = serde_json::from_str(&line).unwrap();
        match parsed {
            Response::Error { error } => assert_eq!(error, "quota exceeded"),
            Response::Success { .. } => panic!("expected error"),
        }
    }

    #[test]
    fn test_missing_event_is_null() {
        let line = Response::success(Option::<Event>::None);
        let parsed: Response<Option<Event>> = serde_json::from_str(&line).unwrap();
        assert!(matches!(parsed, Response::Success { data: None }));
    }
}
