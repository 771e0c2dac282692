use anyhow::{Context, Result};
use guestsync_core::config::SyncConfig;
use guestsync_core::date_range::DateRange;
use guestsync_core::notify::WebhookNotifier;
use guestsync_core::provider::ProviderBackend;
use guestsync_core::reconcile::{PairOutcome, PairReport, Reconciler, RunReport};
use owo_colors::OwoColorize;
use tracing::info;

pub async fn run(pair_filter: Option<&str>, days: Option<u32>) -> Result<()> {
    let mut config = SyncConfig::load()?;
    if let Some(days) = days {
        config.days = days;
        config.validate()?;
    }

    let notifier = WebhookNotifier::from_config(&config).context("Cannot notify failures")?;
    let backend = ProviderBackend::from_config(&config);
    let lock_dir = config.lock_dir()?;
    let range = DateRange::upcoming(config.days);

    info!(
        "Scanning {} to {}",
        range.from.format("%Y-%m-%d %H:%M"),
        range.to.format("%Y-%m-%d %H:%M")
    );

    let reconciler = Reconciler::new(&backend, &notifier, &config).with_lock_dir(lock_dir);

    let report = match pair_filter {
        Some(source) => {
            let pair = config.pair(source).ok_or_else(|| {
                let available: Vec<_> = config.pairs.iter().map(|p| p.source.clone()).collect();
                anyhow::anyhow!(
                    "Pair '{}' not found. Available: {}",
                    source,
                    available.join(", ")
                )
            })?;
            reconciler.run_pairs([pair], &range).await
        }
        None => reconciler.run(&range).await,
    };

    render(&report);

    if report.has_failures() {
        anyhow::bail!("{} failure(s) during sync", report.failures());
    }

    Ok(())
}

fn render(report: &RunReport) {
    for pair in &report.pairs {
        println!("{}", render_pair(pair));
    }

    let mutations = report.mutations();
    if mutations > 0 {
        println!("\nApplied {mutations} change(s)");
    } else {
        println!("\n{}", "Everything up to date".dimmed());
    }
}

fn render_pair(pair: &PairReport) -> String {
    let name = pair.pair.to_string();

    match &pair.outcome {
        PairOutcome::Skipped(reason) => format!("{} {}", name.bold(), reason.yellow()),
        PairOutcome::FetchFailed(reason) => format!("{} {}", name.bold(), reason.red()),
        PairOutcome::Completed => {
            let mut parts = vec![format!("{} events", pair.events)];
            let counters = [
                (pair.statuses_updated, "statuses updated"),
                (pair.guests_invited, "invited"),
                (pair.mirrors_created, "mirrors created"),
                (pair.mirrors_updated, "mirrors updated"),
                (pair.mirrors_deleted, "mirrors deleted"),
                (pair.conflicts, "conflicts"),
            ];
            parts.extend(
                counters
                    .iter()
                    .filter(|(n, _)| *n > 0)
                    .map(|(n, label)| format!("{n} {label}")),
            );

            let line = format!("{} {}", name.bold(), parts.join(", ").dimmed());
            if pair.failures > 0 {
                format!("{} {}", line, format!("{} failed", pair.failures).red())
            } else {
                line
            }
        }
    }
}
