//! Error types for guestsync.

use thiserror::Error;

/// Errors that can occur in guestsync operations.
#[derive(Error, Debug)]
pub enum GuestSyncError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("{0}")]
    ProviderNotInstalled(String),

    #[error("Provider request timed out after {0}s")]
    ProviderTimeout(u64),

    #[error("Notification error: {0}")]
    Notify(String),

    #[error("Pair {0} is locked by another run")]
    PairLocked(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for guestsync operations.
pub type GuestSyncResult<T> = Result<T, GuestSyncError>;
