//! Per-event reconciliation between a source calendar and its guest.
//!
//! For every event in the scan window:
//! - guest present → propagate the guest's RSVP to the owner
//! - guest absent → invite, falling back to a mirror event on the source
//!   calendar when the invite does not stick
//! - event is one of our mirrors → refresh its description or delete it
//!   once the original is gone
//!
//! Every write is preceded by a read of the current state, so running twice
//! over unchanged calendars makes no further changes.

mod invite;
mod mirror;
mod report;
mod status;

pub use invite::InviteOutcome;
pub use mirror::{Candidate, ReflectDecision, classify, decide_reflect, has_existing_mirror, mirror_for};
pub use report::{PairOutcome, PairReport, RunReport};
pub use status::{StatusDecision, StatusPolicy, decide_status};

use std::path::PathBuf;

use tracing::{debug, error, info, warn};

use crate::backend::CalendarBackend;
use crate::config::{CalendarPair, SyncConfig};
use crate::date_range::DateRange;
use crate::error::GuestSyncError;
use crate::event::{Event, GuestStatus};
use crate::lock::PairLock;
use crate::notify::{Notifier, notify_best_effort};

pub struct Reconciler<'a, B: ?Sized, N: ?Sized> {
    backend: &'a B,
    notifier: &'a N,
    config: &'a SyncConfig,
    lock_dir: Option<PathBuf>,
}

impl<'a, B, N> Reconciler<'a, B, N>
where
    B: CalendarBackend + ?Sized,
    N: Notifier + ?Sized,
{
    pub fn new(backend: &'a B, notifier: &'a N, config: &'a SyncConfig) -> Self {
        Reconciler {
            backend,
            notifier,
            config,
            lock_dir: None,
        }
    }

    /// Take a per-pair lock in `dir` before touching each pair.
    pub fn with_lock_dir(mut self, dir: PathBuf) -> Self {
        self.lock_dir = Some(dir);
        self
    }

    /// Reconcile every configured pair, in order.
    pub async fn run(&self, range: &DateRange) -> RunReport {
        self.run_pairs(self.config.pairs.iter(), range).await
    }

    pub async fn run_pairs<'p>(
        &self,
        pairs: impl IntoIterator<Item = &'p CalendarPair>,
        range: &DateRange,
    ) -> RunReport {
        let mut report = RunReport::default();

        for pair in pairs {
            let _lock = match self.lock(pair) {
                Ok(Some(lock)) => {
                    debug!("Holding {}", lock.path().display());
                    Some(lock)
                }
                Ok(None) => None,
                Err(e) => {
                    warn!("Skipping {}: {}", pair, e);
                    let mut skipped = PairReport::new(pair);
                    skipped.outcome = PairOutcome::Skipped(e.to_string());
                    report.pairs.push(skipped);
                    continue;
                }
            };

            report.pairs.push(self.run_pair(pair, range).await);
        }

        report
    }

    fn lock(&self, pair: &CalendarPair) -> Result<Option<PairLock>, GuestSyncError> {
        match &self.lock_dir {
            Some(dir) => PairLock::acquire(dir, pair).map(Some),
            None => Ok(None),
        }
    }

    /// Reconcile all events of one pair inside `range`.
    pub async fn run_pair(&self, pair: &CalendarPair, range: &DateRange) -> PairReport {
        let mut report = PairReport::new(pair);
        info!("Source: {} / Guest: {}", pair.source, pair.guest);

        let events = match self.backend.list_events(&pair.source, range).await {
            Ok(events) => events,
            Err(e) => {
                error!("Failed to list events on {}: {}", pair.source, e);
                if self.config.notify.failures {
                    let message = format!("Failed to list events on {}: {}", pair.source, e);
                    notify_best_effort(self.notifier, &message).await;
                }
                report.outcome = PairOutcome::FetchFailed(e.to_string());
                return report;
            }
        };

        report.events = events.len();
        debug!("Fetched {} events from {}", events.len(), pair.source);

        for event in &events {
            self.reconcile_event(pair, event, &mut report).await;
        }

        report
    }

    /// Apply every rule to a single event.
    pub async fn reconcile_event(&self, pair: &CalendarPair, event: &Event, report: &mut PairReport) {
        match event.guest(&pair.guest) {
            Some(guest) => self.sync_status(event, guest.status, report).await,
            None => self.invite(pair, event, report).await,
        }

        self.reflect_or_delete(pair, event, report).await;
    }

    async fn sync_status(&self, event: &Event, guest_status: GuestStatus, report: &mut PairReport) {
        match decide_status(self.config.status_policy, event.owner_status, guest_status) {
            StatusDecision::Update(status) => {
                match self.backend.set_owner_status(event, status).await {
                    Ok(()) => {
                        info!("Status updated: {} ({})", event, status);
                        report.statuses_updated += 1;
                    }
                    Err(e) => {
                        let message = format!("Failed to sync the status of the event: {event}");
                        self.failure(report, &message, &e).await;
                    }
                }
            }
            StatusDecision::Conflict { owner, guest } => {
                info!("Status conflict on {}: owner {} / guest {}", event, owner, guest);
                report.conflicts += 1;
                if self.config.notify.conflicts {
                    let message = format!("Failed to sync the status of the event: {event}");
                    notify_best_effort(self.notifier, &message).await;
                }
            }
            decision => debug!("Status unchanged for {}: {:?}", event, decision),
        }
    }

    async fn invite(&self, pair: &CalendarPair, event: &Event, report: &mut PairReport) {
        if let Err(e) = self.backend.add_guest(event, &pair.guest).await {
            warn!("Adding {} to {} was rejected: {}", pair.guest, event, e);
        }

        let refreshed = match self.backend.get_event(event).await {
            Ok(refreshed) => refreshed,
            Err(e) => {
                warn!("Could not re-read {}: {}", event, e);
                None
            }
        };

        match InviteOutcome::observe(refreshed.as_ref(), &pair.guest) {
            InviteOutcome::Applied => {
                info!("Invited: {}", event);
                report.guests_invited += 1;
            }
            InviteOutcome::Absent if self.config.naming.is_mirror_title(&event.title) => {
                debug!("Not mirroring {}: it is a mirror itself", event);
            }
            InviteOutcome::Absent => self.create_mirror(pair, event, report).await,
            InviteOutcome::Unknown => {
                let message = format!("Could not confirm invitation of {} to {}", pair.guest, event);
                self.failure(report, &message, &"event could not be re-read").await;
            }
        }
    }

    async fn create_mirror(&self, pair: &CalendarPair, original: &Event, report: &mut PairReport) {
        let naming = &self.config.naming;
        let span = DateRange::covering(&original.start, &original.end);

        let existing = match self.backend.list_events(&pair.source, &span).await {
            Ok(events) => events,
            Err(e) => {
                let message = format!("Failed to look up mirrors of {original}");
                self.failure(report, &message, &e).await;
                return;
            }
        };

        if has_existing_mirror(original, &existing, naming) {
            debug!("Mirror of {} already exists", original);
            return;
        }

        let new_event = mirror_for(original, pair, naming);
        match self.backend.create_event(&pair.source, &new_event).await {
            Ok(created) => {
                info!("Mirror created: {}", created);
                report.mirrors_created += 1;
            }
            Err(e) => {
                let message = format!("Failed to create a mirror of {original}");
                self.failure(report, &message, &e).await;
            }
        }
    }

    async fn reflect_or_delete(&self, pair: &CalendarPair, event: &Event, report: &mut PairReport) {
        let naming = &self.config.naming;

        match classify(event, pair, naming) {
            Candidate::OwnMirror => {}
            Candidate::NotMirror => return,
            Candidate::ForeignCreator => {
                debug!("{} carries the mirror prefix but was not created by {}", event, pair.source);
                return;
            }
        }

        let span = DateRange::covering(&event.start, &event.end);
        let overlapping = match self.backend.list_events(&pair.source, &span).await {
            Ok(events) => events,
            Err(e) => {
                let message = format!("Failed to look up the original of {event}");
                self.failure(report, &message, &e).await;
                return;
            }
        };

        match decide_reflect(event, &overlapping, pair, naming) {
            ReflectDecision::Delete => match self.backend.delete_event(event).await {
                Ok(()) => {
                    info!("Mirror deleted, original is gone: {}", event);
                    report.mirrors_deleted += 1;
                }
                Err(e) => {
                    let message = format!("Failed to delete mirror {event}");
                    self.failure(report, &message, &e).await;
                }
            },
            ReflectDecision::UpdateDescription(expected) => {
                let previous = event
                    .description
                    .as_deref()
                    .and_then(|d| naming.parse_description(d))
                    .map(|(_, body)| body);
                debug!("Description of {} drifted from {:?}", event, previous);

                match self.backend.set_description(event, &expected).await {
                    Ok(()) => {
                        info!("Mirror description updated: {}", event);
                        report.mirrors_updated += 1;
                    }
                    Err(e) => {
                        let message = format!("Failed to update mirror {event}");
                        self.failure(report, &message, &e).await;
                    }
                }
            }
            ReflectDecision::KeepOrphan => {
                info!("Original of {} is gone but the mirror was edited; leaving it", event);
            }
            ReflectDecision::Ambiguous(n) => {
                warn!("{} candidate originals for {}; leaving it", n, event);
            }
            decision => debug!("Mirror {} unchanged: {:?}", event, decision),
        }
    }

    async fn failure(&self, report: &mut PairReport, message: &str, cause: &dyn std::fmt::Display) {
        error!("{}: {}", message, cause);
        report.failures += 1;

        if self.config.notify.failures {
            notify_best_effort(self.notifier, message).await;
        }
    }
}

#[cfg(test)]
mod tests;
