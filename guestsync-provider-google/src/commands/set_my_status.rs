use anyhow::{Context, Result};
use guestsync_core::protocol::SetMyStatus;

use crate::google_event::{is_own_entry, status_to_google};
use crate::session::Session;

pub async fn handle(params: serde_json::Value) -> Result<serde_json::Value> {
    let params: SetMyStatus = serde_json::from_value(params)?;
    let calendar_id = &params.target.calendar_id;

    let response_status = status_to_google(params.status)
        .with_context(|| format!("Cannot set status {}", params.status))?;

    let client = Session::load_valid(&params.target.account).await?.client();
    let mut event = super::fetch_existing(&client, calendar_id, &params.event_id).await?;

    let own = event
        .attendees
        .iter_mut()
        .find(|a| is_own_entry(a, calendar_id))
        .with_context(|| format!("{} is not an attendee of {}", calendar_id, event.summary))?;

    if own.response_status == response_status {
        return Ok(serde_json::Value::Null);
    }

    own.response_status = response_status.to_string();
    super::update(&client, calendar_id, &event).await?;

    Ok(serde_json::Value::Null)
}
