use anyhow::Result;
use guestsync_core::config::SyncConfig;
use guestsync_core::provider::ProviderBackend;
use owo_colors::OwoColorize;

pub fn run() -> Result<()> {
    let config_path = SyncConfig::config_path()?;
    let config = SyncConfig::load_from(&config_path)?;

    println!("{}", "Config".bold());
    println!("  Path:       {}", config_path.display());
    println!("  Days:       {}", config.days);
    println!("  Lock dir:   {}", config.lock_dir()?.display());

    println!("\n{}", "Pairs".bold());
    for pair in &config.pairs {
        println!("  {} ({} as {})", pair, pair.provider, pair.account());
    }

    println!("\n{}", "Providers".bold());
    let mut missing = 0;
    for provider in ProviderBackend::from_config(&config).providers() {
        match provider.binary_path() {
            Ok(path) => println!("  {} {}", provider.name().green(), path.display().dimmed()),
            Err(e) => {
                missing += 1;
                println!("  {} {}", provider.name().red(), e);
            }
        }
    }

    if missing > 0 {
        anyhow::bail!("{missing} provider(s) not installed");
    }

    Ok(())
}
