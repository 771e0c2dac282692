//! Counters collected while reconciling.

use crate::config::CalendarPair;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairOutcome {
    Completed,
    /// Another run holds this pair's lock.
    Skipped(String),
    /// The source calendar could not be listed.
    FetchFailed(String),
}

#[derive(Debug, Clone)]
pub struct PairReport {
    pub pair: CalendarPair,
    pub outcome: PairOutcome,
    pub events: usize,
    pub statuses_updated: usize,
    pub guests_invited: usize,
    pub mirrors_created: usize,
    pub mirrors_updated: usize,
    pub mirrors_deleted: usize,
    pub conflicts: usize,
    pub failures: usize,
}

impl PairReport {
    pub fn new(pair: &CalendarPair) -> Self {
        PairReport {
            pair: pair.clone(),
            outcome: PairOutcome::Completed,
            events: 0,
            statuses_updated: 0,
            guests_invited: 0,
            mirrors_created: 0,
            mirrors_updated: 0,
            mirrors_deleted: 0,
            conflicts: 0,
            failures: 0,
        }
    }

    /// Number of writes made to the calendar.
    pub fn mutations(&self) -> usize {
        self.statuses_updated
            + self.guests_invited
            + self.mirrors_created
            + self.mirrors_updated
            + self.mirrors_deleted
    }

    pub fn has_failures(&self) -> bool {
        self.failures > 0 || matches!(self.outcome, PairOutcome::FetchFailed(_))
    }
}

#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub pairs: Vec<PairReport>,
}

impl RunReport {
    pub fn has_failures(&self) -> bool {
        self.pairs.iter().any(PairReport::has_failures)
    }

    pub fn mutations(&self) -> usize {
        self.pairs.iter().map(PairReport::mutations).sum()
    }

    pub fn failures(&self) -> usize {
        self.pairs
            .iter()
            .map(|p| match p.outcome {
                PairOutcome::FetchFailed(_) => p.failures + 1,
                _ => p.failures,
            })
            .sum()
    }
}
