//! Conversion between Google Calendar API events and guestsync events.
//!
//! Events are always seen from one calendar: that calendar's own attendee
//! entry becomes `owner_status`, every other attendee is a guest.

use anyhow::{Result, bail};
use google_calendar::types::{EventAttendee, EventDateTime};
use guestsync_core::event::{Event, EventTime, GuestEntry, GuestStatus, NewEvent, same_identity};

pub fn status_from_google(response_status: &str) -> GuestStatus {
    match response_status {
        "accepted" => GuestStatus::Yes,
        "declined" => GuestStatus::No,
        "tentative" => GuestStatus::Maybe,
        _ => GuestStatus::NeedsAction,
    }
}

/// `None` for `Owner`, which has no attendee representation.
pub fn status_to_google(status: GuestStatus) -> Option<&'static str> {
    match status {
        GuestStatus::Yes => Some("accepted"),
        GuestStatus::No => Some("declined"),
        GuestStatus::Maybe => Some("tentative"),
        GuestStatus::NeedsAction => Some("needsAction"),
        GuestStatus::Owner => None,
    }
}

pub fn is_cancelled(event: &google_calendar::types::Event) -> bool {
    event.status == "cancelled"
}

/// Whether an attendee entry is the calendar's own.
pub fn is_own_entry(attendee: &EventAttendee, calendar_id: &str) -> bool {
    attendee.self_ || same_identity(&attendee.email, calendar_id)
}

pub fn attendee(email: &str, response_status: &str) -> EventAttendee {
    EventAttendee {
        email: email.to_string(),
        display_name: String::new(),
        response_status: response_status.to_string(),
        additional_guests: 0,
        comment: String::new(),
        id: String::new(),
        optional: false,
        organizer: false,
        resource: false,
        self_: false,
    }
}

fn event_time(time: &Option<EventDateTime>, which: &str) -> Result<EventTime> {
    match time {
        Some(EventDateTime {
            date_time: Some(dt), ..
        }) => Ok(EventTime::DateTime(*dt)),
        Some(EventDateTime { date: Some(d), .. }) => Ok(EventTime::Date(*d)),
        _ => bail!("Event has no {} time", which),
    }
}

pub fn event_time_to_google(time: &EventTime) -> EventDateTime {
    match time {
        EventTime::Date(d) => EventDateTime {
            date: Some(*d),
            date_time: None,
            time_zone: String::new(),
        },
        EventTime::DateTime(dt) => EventDateTime {
            date: None,
            date_time: Some(*dt),
            time_zone: String::new(),
        },
    }
}

pub fn from_google(calendar_id: &str, event: google_calendar::types::Event) -> Result<Event> {
    let start = event_time(&event.start, "start")?;
    let end = event_time(&event.end, "end")?;

    let organized_here = event
        .organizer
        .as_ref()
        .is_some_and(|o| o.self_ || same_identity(&o.email, calendar_id));

    let owner_status = if organized_here {
        GuestStatus::Owner
    } else {
        event
            .attendees
            .iter()
            .find(|a| is_own_entry(a, calendar_id))
            .map(|a| status_from_google(&a.response_status))
            .unwrap_or(GuestStatus::NeedsAction)
    };

    let guests = event
        .attendees
        .iter()
        .filter(|a| !is_own_entry(a, calendar_id))
        .map(|a| GuestEntry::new(a.email.clone(), status_from_google(&a.response_status)))
        .collect();

    let creator = event
        .creator
        .as_ref()
        .map(|c| c.email.clone())
        .filter(|email| !email.is_empty())
        .or_else(|| event.organizer.as_ref().map(|o| o.email.clone()))
        .unwrap_or_default();

    Ok(Event {
        id: event.id,
        calendar: calendar_id.to_string(),
        title: event.summary,
        // Google omits empty descriptions; that is still a known, empty text
        description: Some(event.description),
        start,
        end,
        creator,
        guests,
        owner_status,
    })
}

pub fn new_event_to_google(event: &NewEvent) -> google_calendar::types::Event {
    google_calendar::types::Event {
        summary: event.title.clone(),
        description: event.description.clone(),
        start: Some(event_time_to_google(&event.start)),
        end: Some(event_time_to_google(&event.end)),
        attendees: event
            .guests
            .iter()
            .map(|email| attendee(email, "needsAction"))
            .collect(),
        ..Default::default()
    }
}
