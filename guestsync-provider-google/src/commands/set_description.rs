use anyhow::Result;
use guestsync_core::protocol::SetDescription;

use crate::session::Session;

pub async fn handle(params: serde_json::Value) -> Result<serde_json::Value> {
    let params: SetDescription = serde_json::from_value(params)?;
    let calendar_id = &params.target.calendar_id;

    let client = Session::load_valid(&params.target.account).await?.client();
    let mut event = super::fetch_existing(&client, calendar_id, &params.event_id).await?;

    event.description = params.description;
    super::update(&client, calendar_id, &event).await?;

    Ok(serde_json::Value::Null)
}
