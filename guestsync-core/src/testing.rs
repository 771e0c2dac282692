//! In-memory backend and notifier for tests.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::backend::CalendarBackend;
use crate::date_range::DateRange;
use crate::error::{GuestSyncError, GuestSyncResult};
use crate::event::{Event, EventTime, GuestEntry, GuestStatus, NewEvent, same_identity};
use crate::notify::Notifier;

pub const SOURCE: &str = "source@example.com";
pub const GUEST: &str = "guest@example.net";

#[derive(Default)]
struct State {
    events: Vec<Event>,
    next_id: u64,
    /// Identities whose invitations are accepted but never show up
    dropped_guests: HashSet<String>,
    fail_list: bool,
    fail_reread: bool,
    writes: usize,
}

/// A calendar store that behaves like the real backend for the reconciler.
#[derive(Default)]
pub struct MemoryCalendar {
    state: Mutex<State>,
}

impl MemoryCalendar {
    pub fn with_events(events: Vec<Event>) -> Self {
        let calendar = MemoryCalendar::default();
        calendar.state.lock().unwrap().events = events;
        calendar
    }

    pub fn drop_invites_for(&self, identity: &str) {
        self.state
            .lock()
            .unwrap()
            .dropped_guests
            .insert(identity.to_string());
    }

    pub fn fail_listing(&self) {
        self.state.lock().unwrap().fail_list = true;
    }

    pub fn fail_rereads(&self) {
        self.state.lock().unwrap().fail_reread = true;
    }

    pub fn events(&self) -> Vec<Event> {
        self.state.lock().unwrap().events.clone()
    }

    pub fn find(&self, title: &str) -> Option<Event> {
        self.events().into_iter().find(|e| e.title == title)
    }

    pub fn count(&self, title: &str) -> usize {
        self.events().iter().filter(|e| e.title == title).count()
    }

    pub fn insert(&self, event: Event) {
        self.state.lock().unwrap().events.push(event);
    }

    pub fn update(&self, id: &str, f: impl FnOnce(&mut Event)) {
        let mut state = self.state.lock().unwrap();
        if let Some(event) = state.events.iter_mut().find(|e| e.id == id) {
            f(event);
        }
    }

    pub fn remove(&self, id: &str) {
        self.state.lock().unwrap().events.retain(|e| e.id != id);
    }

    /// Number of successful writes so far.
    pub fn writes(&self) -> usize {
        self.state.lock().unwrap().writes
    }

    fn modify(&self, event: &Event, f: impl FnOnce(&mut Event)) -> GuestSyncResult<()> {
        let mut state = self.state.lock().unwrap();
        let stored = state
            .events
            .iter_mut()
            .find(|e| e.id == event.id && e.calendar == event.calendar)
            .ok_or_else(|| GuestSyncError::Provider(format!("No event {}", event.id)))?;
        f(stored);
        state.writes += 1;
        Ok(())
    }
}

#[async_trait]
impl CalendarBackend for MemoryCalendar {
    async fn list_events(&self, calendar: &str, range: &DateRange) -> GuestSyncResult<Vec<Event>> {
        let state = self.state.lock().unwrap();
        if state.fail_list {
            return Err(GuestSyncError::Provider("listing unavailable".into()));
        }

        Ok(state
            .events
            .iter()
            .filter(|e| same_identity(&e.calendar, calendar))
            .filter(|e| e.start.to_utc() < range.to && e.end.to_utc() > range.from)
            .cloned()
            .collect())
    }

    async fn get_event(&self, event: &Event) -> GuestSyncResult<Option<Event>> {
        let state = self.state.lock().unwrap();
        if state.fail_reread {
            return Err(GuestSyncError::Provider("re-read unavailable".into()));
        }

        Ok(state
            .events
            .iter()
            .find(|e| e.id == event.id && e.calendar == event.calendar)
            .cloned())
    }

    async fn set_owner_status(&self, event: &Event, status: GuestStatus) -> GuestSyncResult<()> {
        self.modify(event, |e| e.owner_status = status)
    }

    async fn add_guest(&self, event: &Event, identity: &str) -> GuestSyncResult<()> {
        let dropped = self.state.lock().unwrap().dropped_guests.contains(identity);
        if dropped {
            return Ok(());
        }

        self.modify(event, |e| {
            if e.guest(identity).is_none() {
                e.guests.push(GuestEntry::new(identity, GuestStatus::NeedsAction));
            }
        })
    }

    async fn create_event(&self, calendar: &str, event: &NewEvent) -> GuestSyncResult<Event> {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;

        let created = Event {
            id: format!("created-{}", state.next_id),
            calendar: calendar.to_string(),
            title: event.title.clone(),
            description: Some(event.description.clone()),
            start: event.start.clone(),
            end: event.end.clone(),
            creator: calendar.to_string(),
            guests: event
                .guests
                .iter()
                .filter(|g| !same_identity(g, calendar))
                .map(|g| GuestEntry::new(g.clone(), GuestStatus::NeedsAction))
                .collect(),
            owner_status: GuestStatus::Owner,
        };

        state.events.push(created.clone());
        state.writes += 1;
        Ok(created)
    }

    async fn set_description(&self, event: &Event, description: &str) -> GuestSyncResult<()> {
        self.modify(event, |e| e.description = Some(description.to_string()))
    }

    async fn delete_event(&self, event: &Event) -> GuestSyncResult<()> {
        let mut state = self.state.lock().unwrap();
        let before = state.events.len();
        state.events.retain(|e| e.id != event.id);
        if state.events.len() == before {
            return Err(GuestSyncError::Provider(format!("No event {}", event.id)));
        }
        state.writes += 1;
        Ok(())
    }
}

/// Collects notification messages instead of sending them.
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, message: &str) -> GuestSyncResult<()> {
        self.messages.lock().unwrap().push(message.to_string());
        Ok(())
    }
}

/// An event on the source calendar, 15:00–16:00 on 2025-03-20 plus `day_offset` days.
pub fn source_event(id: &str, title: &str, day_offset: u32) -> Event {
    let day = 20 + day_offset;
    Event {
        id: id.to_string(),
        calendar: SOURCE.to_string(),
        title: title.to_string(),
        description: None,
        start: EventTime::DateTime(Utc.with_ymd_and_hms(2025, 3, day, 15, 0, 0).unwrap()),
        end: EventTime::DateTime(Utc.with_ymd_and_hms(2025, 3, day, 16, 0, 0).unwrap()),
        creator: "organizer@example.com".to_string(),
        guests: vec![],
        owner_status: GuestStatus::NeedsAction,
    }
}

/// Scan window covering every event built by [`source_event`].
pub fn march_window() -> DateRange {
    DateRange::upcoming_from(Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap(), 30)
}
