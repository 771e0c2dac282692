//! Per-pair run lock.
//!
//! The existence check before creating a mirror and the creation itself are
//! two separate backend calls, so two overlapping runs on the same pair can
//! both create a mirror. Runs on one host serialize on an advisory file lock
//! keyed by the pair. Runs on different hosts are not covered.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::config::CalendarPair;
use crate::error::{GuestSyncError, GuestSyncResult};

/// Holds the lock for one pair until dropped.
#[derive(Debug)]
pub struct PairLock {
    _file: File,
    path: PathBuf,
}

impl PairLock {
    /// Take the lock without waiting. Fails with `PairLocked` if another run holds it.
    pub fn acquire(dir: &Path, pair: &CalendarPair) -> GuestSyncResult<Self> {
        fs::create_dir_all(dir)?;

        let path = dir.join(lock_file_name(pair));
        let file = File::create(&path)?;

        file.try_lock_exclusive()
            .map_err(|_| GuestSyncError::PairLocked(pair.to_string()))?;

        Ok(PairLock { _file: file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn lock_file_name(pair: &CalendarPair) -> String {
    let safe = |s: &str| -> String {
        s.chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '@') {
                    c.to_ascii_lowercase()
                } else {
                    '_'
                }
            })
            .collect()
    };
    format!("{}__{}.lock", safe(&pair.source), safe(&pair.guest))
}
