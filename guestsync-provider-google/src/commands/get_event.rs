use anyhow::Result;
use guestsync_core::protocol::GetEvent;

use crate::google_event::from_google;
use crate::session::Session;

pub async fn handle(params: serde_json::Value) -> Result<serde_json::Value> {
    let params: GetEvent = serde_json::from_value(params)?;
    let calendar_id = &params.target.calendar_id;

    let client = Session::load_valid(&params.target.account).await?.client();

    let event = match super::fetch(&client, calendar_id, &params.event_id).await? {
        Some(google_event) => Some(from_google(calendar_id, google_event)?),
        None => None,
    };

    Ok(serde_json::to_value(event)?)
}
