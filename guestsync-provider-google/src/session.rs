//! Per-account OAuth tokens, refreshed before they expire.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use google_calendar::{AccessToken, Client};
use serde::{Deserialize, Serialize};

use crate::app_config::{self, Credentials, base_dir};

/// Tokens this close to expiry are refreshed before use.
const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Tokens {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<&AccessToken> for Tokens {
    fn from(token: &AccessToken) -> Self {
        let expires_at = if token.expires_in > 0 {
            Some(Utc::now() + Duration::seconds(token.expires_in))
        } else {
            None
        };

        Tokens {
            access_token: token.access_token.clone(),
            refresh_token: token.refresh_token.clone(),
            expires_at,
        }
    }
}

impl Tokens {
    fn path_for_account(account: &str) -> Result<std::path::PathBuf> {
        let slug = account.replace(['/', '\\', ':'], "_");

        Ok(base_dir()?.join("tokens").join(format!("{}.json", slug)))
    }

    pub fn load(account: &str) -> Result<Self> {
        let path = Self::path_for_account(account)?;

        if !path.exists() {
            anyhow::bail!(
                "No Google session for {}. Run `guestsync auth --provider google` first.",
                account
            );
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read tokens from {}", path.display()))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse tokens from {}", path.display()))
    }

    pub fn save(&self, account: &str) -> Result<()> {
        let path = Self::path_for_account(account)?;
        let contents = serde_json::to_string_pretty(self).context("Failed to serialize tokens")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write tokens to {}", path.display()))?;

        // Set to owner-only (0600) since file contains OAuth tokens:
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("Failed to set permissions on {}", path.display()))?;
        }

        Ok(())
    }

    fn needs_refresh(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => Utc::now() + Duration::seconds(EXPIRY_MARGIN_SECS) >= expires_at,
            None => false,
        }
    }
}

pub struct Session {
    creds: Credentials,
    tokens: Tokens,
}

impl Session {
    /// Load the account's tokens and refresh them if expired.
    pub async fn load_valid(account: &str) -> Result<Self> {
        let creds = app_config::load()?;
        let mut tokens = Tokens::load(account)?;

        if tokens.needs_refresh() {
            tokens = refresh(&creds, &tokens).await?;
            tokens.save(account)?;
        }

        Ok(Session { creds, tokens })
    }

    pub fn client(&self) -> Client {
        Client::new(
            self.creds.client_id.clone(),
            self.creds.client_secret.clone(),
            String::new(),
            self.tokens.access_token.clone(),
            self.tokens.refresh_token.clone(),
        )
    }
}

async fn refresh(creds: &Credentials, tokens: &Tokens) -> Result<Tokens> {
    let client = Client::new(
        creds.client_id.clone(),
        creds.client_secret.clone(),
        String::new(),
        tokens.access_token.clone(),
        tokens.refresh_token.clone(),
    );

    let mut refreshed: Tokens = (&client
        .refresh_access_token()
        .await
        .context("Failed to refresh token")?)
        .into();

    // Google typically doesn't return a new refresh_token on refresh
    if refreshed.refresh_token.is_empty() {
        refreshed.refresh_token = tokens.refresh_token.clone();
    }

    Ok(refreshed)
}
