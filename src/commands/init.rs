use anyhow::{Context, Result};
use guestsync_core::config::SyncConfig;

pub fn run() -> Result<()> {
    let path = SyncConfig::config_path()?;

    if path.exists() {
        println!("Config already exists at {}", path.display());
        return Ok(());
    }

    SyncConfig::create_default_config(&path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Created {}", path.display());
    println!("\nSet webhook_url and add a [[pairs]] entry, then run `guestsync check`.");

    Ok(())
}
