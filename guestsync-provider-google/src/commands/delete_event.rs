use anyhow::{Context, Result};
use google_calendar::types::SendUpdates;
use guestsync_core::protocol::DeleteEvent;

use crate::session::Session;

pub async fn handle(params: serde_json::Value) -> Result<serde_json::Value> {
    let params: DeleteEvent = serde_json::from_value(params)?;
    let calendar_id = &params.target.calendar_id;
    let event_id = &params.event_id;

    let client = Session::load_valid(&params.target.account).await?.client();

    let result = client
        .events()
        .delete(calendar_id, event_id, false, SendUpdates::None)
        .await;

    match result {
        Ok(_) => Ok(serde_json::Value::Null),
        Err(e) if super::is_gone(&e) => Ok(serde_json::Value::Null),
        Err(e) => Err(e).with_context(|| format!("Failed to delete event: {}", event_id)),
    }
}
