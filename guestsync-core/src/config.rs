//! Run configuration at ~/.config/guestsync/config.toml
//!
//! The configuration is loaded once at startup and passed explicitly into
//! the reconciler. Nothing reads it as ambient state afterwards.

use std::fmt;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_PROVIDER, DEFAULT_SYNC_DAYS, MAX_SYNC_DAYS};
use crate::error::{GuestSyncError, GuestSyncResult};
use crate::mirror::MirrorNaming;
use crate::reconcile::StatusPolicy;

fn default_days() -> u32 {
    DEFAULT_SYNC_DAYS
}

fn default_provider() -> String {
    DEFAULT_PROVIDER.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// How many days ahead of now to scan
    #[serde(default = "default_days")]
    pub days: u32,

    /// Webhook that receives `{"text": ...}` notifications. Required.
    pub webhook_url: Option<String>,

    #[serde(default)]
    pub status_policy: StatusPolicy,

    /// Where per-pair run locks live (defaults to the runtime dir)
    #[serde(default)]
    pub lock_dir: Option<PathBuf>,

    #[serde(default)]
    pub naming: MirrorNaming,

    #[serde(default)]
    pub notify: NotifySettings,

    #[serde(default)]
    pub pairs: Vec<CalendarPair>,
}

/// Which events trigger a webhook notification. Both are off by default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotifySettings {
    #[serde(default)]
    pub failures: bool,
    #[serde(default)]
    pub conflicts: bool,
}

/// A source calendar and the guest identity mirrored into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarPair {
    pub source: String,
    pub guest: String,
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Account whose credentials reach the source calendar (defaults to `source`)
    #[serde(default)]
    pub account: Option<String>,
}

impl CalendarPair {
    pub fn new(source: impl Into<String>, guest: impl Into<String>) -> Self {
        CalendarPair {
            source: source.into(),
            guest: guest.into(),
            provider: default_provider(),
            account: None,
        }
    }

    pub fn account(&self) -> &str {
        self.account.as_deref().unwrap_or(&self.source)
    }
}

impl fmt::Display for CalendarPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.source, self.guest)
    }
}

impl SyncConfig {
    pub fn config_path() -> GuestSyncResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| GuestSyncError::Config("Could not determine config directory".into()))?
            .join("guestsync");

        Ok(config_dir.join("config.toml"))
    }

    /// Load and validate the config from its default location.
    pub fn load() -> GuestSyncResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load from `path`, with `GUESTSYNC_*` environment variables taking precedence.
    pub fn load_from(path: &Path) -> GuestSyncResult<Self> {
        if !path.exists() {
            return Err(GuestSyncError::Config(format!(
                "Config file not found at {}\nCreate one with `guestsync init`.",
                path.display()
            )));
        }

        let config: SyncConfig = Config::builder()
            .add_source(File::from(path.to_path_buf()))
            .add_source(Environment::with_prefix("GUESTSYNC").try_parsing(true))
            .build()
            .map_err(|e| GuestSyncError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| GuestSyncError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that must abort a run before any pair is touched.
    pub fn validate(&self) -> GuestSyncResult<()> {
        self.webhook_url()?;

        if self.days == 0 {
            return Err(GuestSyncError::Config("`days` must be greater than 0".into()));
        }

        if self.days > MAX_SYNC_DAYS {
            return Err(GuestSyncError::Config(format!(
                "`days` must be at most {MAX_SYNC_DAYS}"
            )));
        }

        if self.pairs.is_empty() {
            return Err(GuestSyncError::Config(
                "No calendar pairs configured. Add a [[pairs]] table.".into(),
            ));
        }

        if self.naming.mirror_prefix.is_empty() {
            return Err(GuestSyncError::Config(
                "`naming.mirror_prefix` must not be empty".into(),
            ));
        }

        for pair in &self.pairs {
            if pair.source.trim().is_empty() || pair.guest.trim().is_empty() {
                return Err(GuestSyncError::Config(format!(
                    "Pair {pair} has an empty calendar id"
                )));
            }
        }

        Ok(())
    }

    pub fn webhook_url(&self) -> GuestSyncResult<&str> {
        match self.webhook_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => Ok(url),
            _ => Err(GuestSyncError::Config(
                "`webhook_url` is not set. Set it in config.toml or GUESTSYNC_WEBHOOK_URL.".into(),
            )),
        }
    }

    /// Find the pair whose source calendar is `source`.
    pub fn pair(&self, source: &str) -> Option<&CalendarPair> {
        self.pairs
            .iter()
            .find(|p| crate::event::same_identity(&p.source, source))
    }

    pub fn lock_dir(&self) -> GuestSyncResult<PathBuf> {
        if let Some(dir) = &self.lock_dir {
            let expanded = shellexpand::tilde(&dir.to_string_lossy()).into_owned();
            return Ok(PathBuf::from(expanded));
        }

        let runtime_dir = dirs::runtime_dir()
            .or_else(dirs::cache_dir)
            .ok_or_else(|| GuestSyncError::Config("Could not determine runtime directory".into()))?;

        Ok(runtime_dir.join("guestsync"))
    }

    /// Create a config file with every option documented.
    pub fn create_default_config(path: &Path) -> GuestSyncResult<()> {
        let contents = format!(
            "\
# guestsync configuration

# Days ahead of now to scan on every run:
days = {DEFAULT_SYNC_DAYS}

# Incoming webhook for failure notifications (required):
# webhook_url = \"https://hooks.slack.com/services/...\"

# How to handle an owner who already answered differently from the guest:
# \"keep-owner-decision\" (default) or \"legacy-disjunction\"
# status_policy = \"keep-owner-decision\"

# [notify]
# failures = false
# conflicts = false

# [naming]
# mirror_prefix = \"【△】\"
# tag_prefix = \"【copied event from \"
# tag_suffix = \"】\"

# [[pairs]]
# source = \"source_01@example.com\"
# guest = \"guest_01@example.net\"
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                GuestSyncError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| GuestSyncError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
