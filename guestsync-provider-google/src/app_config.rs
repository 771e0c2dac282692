//! OAuth client credentials for the Google provider.
//!
//! User-provided, stored at:
//!   ~/.config/guestsync/providers/google/credentials.json

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

/// The file downloaded from the Google Cloud console nests the
/// credentials under "installed" (desktop apps) or "web".
#[derive(Deserialize)]
#[serde(untagged)]
enum CredentialsFile {
    Installed { installed: Credentials },
    Web { web: Credentials },
    Flat(Credentials),
}

pub fn base_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .context("Could not determine config directory")?
        .join("guestsync")
        .join("providers")
        .join("google"))
}

pub fn load() -> Result<Credentials> {
    let path = base_dir()?.join("credentials.json");

    if !path.exists() {
        anyhow::bail!(
            "Google credentials not found.\n\n\
            Download an OAuth client (Desktop app) from\n\
            https://console.cloud.google.com/apis/credentials\n\
            and save it as {}",
            path.display()
        );
    }

    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read credentials from {}", path.display()))?;

    parse(&contents).with_context(|| format!("Failed to parse credentials from {}", path.display()))
}

fn parse(contents: &str) -> Result<Credentials> {
    let file: CredentialsFile = serde_json::from_str(contents)?;

    Ok(match file {
        CredentialsFile::Installed { installed } => installed,
        CredentialsFile::Web { web } => web,
        CredentialsFile::Flat(creds) => creds,
    })
}
