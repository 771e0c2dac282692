use anyhow::{Context, Result};
use google_calendar::types::OrderBy;
use guestsync_core::Event;
use guestsync_core::protocol::ListEvents;

use crate::google_event::{from_google, is_cancelled};
use crate::session::Session;

pub async fn handle(params: serde_json::Value) -> Result<serde_json::Value> {
    let params: ListEvents = serde_json::from_value(params)?;
    let calendar_id = params.target.calendar_id;

    let client = Session::load_valid(&params.target.account).await?.client();

    // single_events expands recurring series into individual occurrences
    let response = client
        .events()
        .list_all(
            &calendar_id,
            "",
            0,
            OrderBy::default(),
            &[],
            "", // search query
            &[],
            false,
            false,
            true,
            &params.to,
            &params.from,
            "",
            "",
        )
        .await
        .with_context(|| format!("Failed to fetch events of {}", calendar_id))?;

    let events: Vec<Event> = response
        .body
        .into_iter()
        .filter(|e| !is_cancelled(e))
        .map(|e| from_google(&calendar_id, e))
        .collect::<Result<_>>()?;

    Ok(serde_json::to_value(events)?)
}
