//! Inviting the guest onto a source event.

use crate::event::Event;

/// What a re-read of the event says about an invitation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InviteOutcome {
    /// The guest is on the event.
    Applied,
    /// The event was re-read and the guest is not on it.
    Absent,
    /// The event could not be re-read.
    Unknown,
}

impl InviteOutcome {
    /// Judge the outcome from the re-read snapshot (`None` if it could not be read).
    pub fn observe(refreshed: Option<&Event>, guest: &str) -> Self {
        match refreshed {
            Some(event) if event.guest(guest).is_some() => InviteOutcome::Applied,
            Some(_) => InviteOutcome::Absent,
            None => InviteOutcome::Unknown,
        }
    }
}
