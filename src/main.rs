mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use guestsync_core::constants::DEFAULT_PROVIDER;

#[derive(Parser)]
#[command(name = "guestsync")]
#[command(about = "Keep a guest identity in step with the events of a source calendar")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile every configured pair once
    Run {
        /// Only operate on the pair with this source calendar
        #[arg(short, long)]
        pair: Option<String>,

        /// Scan this many days ahead instead of the configured value
        #[arg(long)]
        days: Option<u32>,
    },
    /// Validate the configuration and look for provider binaries
    Check,
    /// Write a default configuration file
    Init,
    Auth {
        #[arg(long, default_value = DEFAULT_PROVIDER)]
        provider: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { pair, days } => commands::run::run(pair.as_deref(), days).await,
        Commands::Check => commands::check::run(),
        Commands::Init => commands::init::run(),
        Commands::Auth { provider } => commands::auth::run(&provider).await,
    }
}
