//! Guest → owner RSVP propagation.

use serde::{Deserialize, Serialize};

use crate::event::GuestStatus;

/// How to treat an owner who has already answered.
///
/// Two rules have been in use. `KeepOwnerDecision` copies the guest's
/// answer unless the owner already gave a different one. `LegacyDisjunction`
/// treats every event where the owner answered *or* differs from the guest
/// as a conflict, which leaves no event it would ever update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusPolicy {
    #[default]
    KeepOwnerDecision,
    LegacyDisjunction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusDecision {
    /// The guest has not answered; nothing to propagate.
    GuestUndecided,
    /// Both already agree.
    InSync,
    /// The owner created the event; their entry is never touched.
    OwnerIsCreator,
    /// The owner answered differently. Left alone.
    Conflict {
        owner: GuestStatus,
        guest: GuestStatus,
    },
    /// Set the owner's status to this value.
    Update(GuestStatus),
}

/// Decide what to do with the owner's status given the guest's.
pub fn decide_status(policy: StatusPolicy, owner: GuestStatus, guest: GuestStatus) -> StatusDecision {
    if !guest.is_decided() {
        return StatusDecision::GuestUndecided;
    }

    match policy {
        StatusPolicy::KeepOwnerDecision => {
            if owner == guest {
                StatusDecision::InSync
            } else if owner.is_decided() {
                StatusDecision::Conflict { owner, guest }
            } else if owner == GuestStatus::Owner {
                StatusDecision::OwnerIsCreator
            } else {
                StatusDecision::Update(guest)
            }
        }
        StatusPolicy::LegacyDisjunction => {
            // The update arm of this rule needs `owner != guest` while the
            // conflict arm already took every such case.
            if owner.is_decided() || owner != guest {
                StatusDecision::Conflict { owner, guest }
            } else {
                StatusDecision::InSync
            }
        }
    }
}
