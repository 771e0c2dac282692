pub mod add_guest;
pub mod authenticate;
pub mod create_event;
pub mod delete_event;
pub mod get_event;
pub mod list_events;
pub mod set_description;
pub mod set_my_status;

use anyhow::{Context, Result};
use google_calendar::Client;
use google_calendar::types::SendUpdates;

/// Google answers 404 for unknown ids and 410 for events already deleted.
pub fn is_gone(error: &impl std::fmt::Display) -> bool {
    let error_str = error.to_string();
    error_str.contains("404")
        || error_str.contains("Not Found")
        || error_str.contains("410")
        || error_str.contains("Gone")
}

/// Fetch one event, `None` if it no longer exists.
pub async fn fetch(
    client: &Client,
    calendar_id: &str,
    event_id: &str,
) -> Result<Option<google_calendar::types::Event>> {
    match client
        .events()
        .get(calendar_id, event_id, false, 0, "")
        .await
    {
        Ok(response) if crate::google_event::is_cancelled(&response.body) => Ok(None),
        Ok(response) => Ok(Some(response.body)),
        Err(e) if is_gone(&e) => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed to fetch event: {}", event_id)),
    }
}

/// Fetch an event that must exist.
pub async fn fetch_existing(
    client: &Client,
    calendar_id: &str,
    event_id: &str,
) -> Result<google_calendar::types::Event> {
    fetch(client, calendar_id, event_id)
        .await?
        .with_context(|| format!("Event not found: {}", event_id))
}

pub async fn update(
    client: &Client,
    calendar_id: &str,
    event: &google_calendar::types::Event,
) -> Result<()> {
    client
        .events()
        .update(
            calendar_id,
            &event.id,
            0,
            0,
            false,
            SendUpdates::None,
            false,
            event,
        )
        .await
        .with_context(|| format!("Failed to update event: {}", event.summary))?;

    Ok(())
}
