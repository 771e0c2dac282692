//! Decisions about mirror events: when to create one, and whether an
//! existing one should be refreshed, deleted, or left alone.

use crate::config::CalendarPair;
use crate::event::{Event, NewEvent};
use crate::mirror::{MirrorNaming, same_occurrence};

/// How a scanned event relates to the mirrors this pair manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Candidate {
    NotMirror,
    /// Carries the prefix but was created by someone else.
    ForeignCreator,
    OwnMirror,
}

pub fn classify(event: &Event, pair: &CalendarPair, naming: &MirrorNaming) -> Candidate {
    if !naming.is_mirror_title(&event.title) {
        Candidate::NotMirror
    } else if !event.is_created_by(&pair.source) {
        Candidate::ForeignCreator
    } else {
        Candidate::OwnMirror
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReflectDecision {
    /// No original left and the mirror is untouched.
    Delete,
    /// No original, but the mirror's guests changed since it was created.
    KeepOrphan,
    /// More than one event could be the original.
    Ambiguous(usize),
    /// One side has no description to compare.
    MissingDescription,
    InSync,
    /// Rewrite the mirror's description to this text.
    UpdateDescription(String),
}

/// Decide what to do with one of our mirrors, given the events on the
/// source calendar overlapping its time span.
pub fn decide_reflect(
    mirror: &Event,
    overlapping: &[Event],
    pair: &CalendarPair,
    naming: &MirrorNaming,
) -> ReflectDecision {
    let originals: Vec<&Event> = overlapping
        .iter()
        .filter(|e| same_occurrence(e, mirror, naming))
        .collect();

    let original = match originals.as_slice() {
        [] => {
            return if is_untouched(mirror, pair) {
                ReflectDecision::Delete
            } else {
                ReflectDecision::KeepOrphan
            };
        }
        [original] => *original,
        many => return ReflectDecision::Ambiguous(many.len()),
    };

    let (Some(current), Some(original_description)) = (&mirror.description, &original.description)
    else {
        return ReflectDecision::MissingDescription;
    };

    let expected = naming.mirror_description(&pair.source, original_description);
    if *current == expected {
        ReflectDecision::InSync
    } else {
        ReflectDecision::UpdateDescription(expected)
    }
}

/// A mirror still in the shape we created it: only the configured guest,
/// created by the source.
fn is_untouched(mirror: &Event, pair: &CalendarPair) -> bool {
    mirror.guests.len() == 1
        && mirror.guest(&pair.guest).is_some()
        && mirror.is_created_by(&pair.source)
}

/// Whether `candidates` already contain a mirror of `original`.
pub fn has_existing_mirror(original: &Event, candidates: &[Event], naming: &MirrorNaming) -> bool {
    candidates
        .iter()
        .any(|c| same_occurrence(original, c, naming))
}

/// The event to create on the source calendar in place of a failed invite.
pub fn mirror_for(original: &Event, pair: &CalendarPair, naming: &MirrorNaming) -> NewEvent {
    NewEvent {
        title: naming.mirror_title(&original.title),
        start: original.start.clone(),
        end: original.end.clone(),
        guests: vec![pair.guest.clone(), pair.source.clone()],
        description: naming
            .mirror_description(&pair.source, original.description.as_deref().unwrap_or("")),
    }
}
