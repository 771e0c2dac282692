use anyhow::{Context, Result};
use google_calendar::types::SendUpdates;
use guestsync_core::protocol::CreateEvent;

use crate::google_event::{from_google, new_event_to_google};
use crate::session::Session;

pub async fn handle(params: serde_json::Value) -> Result<serde_json::Value> {
    let params: CreateEvent = serde_json::from_value(params)?;
    let calendar_id = &params.target.calendar_id;

    let client = Session::load_valid(&params.target.account).await?.client();

    let google_event = new_event_to_google(&params.event);

    let response = client
        .events()
        .insert(
            calendar_id,
            0,
            0,
            false,
            SendUpdates::None,
            false,
            &google_event,
        )
        .await
        .with_context(|| format!("Failed to create event: {}", params.event.title))?;

    let created = from_google(calendar_id, response.body)?;
    Ok(serde_json::to_value(created)?)
}
