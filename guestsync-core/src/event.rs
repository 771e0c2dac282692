//! Provider-neutral event types.
//!
//! Providers convert their API responses into these types, and the
//! reconciler works exclusively with them. An `Event` is always a fresh
//! snapshot read during the current run; nothing is cached between runs.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A calendar event as seen from one calendar (provider-neutral).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Provider-assigned event id
    pub id: String,
    /// Calendar the event was read from
    pub calendar: String,
    pub title: String,
    pub description: Option<String>,
    pub start: EventTime,
    pub end: EventTime,
    /// Identity that created the event
    pub creator: String,
    /// Invitees, not including the calendar owner's own entry
    pub guests: Vec<GuestEntry>,
    /// The calendar owner's own response to this event
    pub owner_status: GuestStatus,
}

impl Event {
    /// Look up the guest entry for an identity on this snapshot.
    pub fn guest(&self, identity: &str) -> Option<&GuestEntry> {
        self.guests
            .iter()
            .find(|g| same_identity(&g.identity, identity))
    }

    pub fn is_created_by(&self, identity: &str) -> bool {
        same_identity(&self.creator, identity)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.start)
    }
}

/// A guest on an event and their response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuestEntry {
    pub identity: String,
    pub status: GuestStatus,
}

impl GuestEntry {
    pub fn new(identity: impl Into<String>, status: GuestStatus) -> Self {
        GuestEntry {
            identity: identity.into(),
            status,
        }
    }
}

/// RSVP state of a participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GuestStatus {
    NeedsAction,
    Yes,
    No,
    Maybe,
    /// The participant created the event. Never overwritten.
    Owner,
}

impl GuestStatus {
    /// Whether this is an actual answer (yes/no/maybe).
    pub fn is_decided(self) -> bool {
        matches!(self, GuestStatus::Yes | GuestStatus::No | GuestStatus::Maybe)
    }
}

impl fmt::Display for GuestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GuestStatus::NeedsAction => "NEEDS_ACTION",
            GuestStatus::Yes => "YES",
            GuestStatus::No => "NO",
            GuestStatus::Maybe => "MAYBE",
            GuestStatus::Owner => "OWNER",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventTime {
    DateTime(DateTime<Utc>),
    /// All-day event
    Date(NaiveDate),
}

impl EventTime {
    /// Instant used for range queries. All-day dates start at midnight UTC.
    pub fn to_utc(&self) -> DateTime<Utc> {
        match self {
            EventTime::DateTime(dt) => *dt,
            EventTime::Date(d) => d.and_time(chrono::NaiveTime::MIN).and_utc(),
        }
    }
}

impl fmt::Display for EventTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventTime::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M UTC")),
            EventTime::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

/// Fields for an event to be created by the reconciler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEvent {
    pub title: String,
    pub start: EventTime,
    pub end: EventTime,
    pub guests: Vec<String>,
    pub description: String,
}

/// Calendar identities are e-mail addresses, compared case-insensitively.
pub fn same_identity(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}
