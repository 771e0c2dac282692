use anyhow::Result;
use guestsync_core::protocol::AddGuest;
use guestsync_core::same_identity;

use crate::google_event::attendee;
use crate::session::Session;

pub async fn handle(params: serde_json::Value) -> Result<serde_json::Value> {
    let params: AddGuest = serde_json::from_value(params)?;
    let calendar_id = &params.target.calendar_id;

    let client = Session::load_valid(&params.target.account).await?.client();
    let mut event = super::fetch_existing(&client, calendar_id, &params.event_id).await?;

    if event
        .attendees
        .iter()
        .any(|a| same_identity(&a.email, &params.identity))
    {
        return Ok(serde_json::Value::Null);
    }

    event
        .attendees
        .push(attendee(&params.identity, "needsAction"));
    super::update(&client, calendar_id, &event).await?;

    Ok(serde_json::Value::Null)
}
