mod classify;
mod error;
mod feed;
mod ingest;
mod notify;
mod parser;
mod posting;
mod store;

use std::path::PathBuf;

use anyhow::{bail, Result};
use chrono::Local;
use clap::Parser;
use tracing::info;

use classify::Classifier;
use feed::HttpFeed;
use ingest::{FailurePolicy, IngestLoop, POLL_INTERVAL};
use notify::{DesktopNotifier, LogNotifier, Notifier};
use store::{SnapshotStore, StorageCategory};

#[derive(Parser)]
#[command(name = "upfeed", about = "Watch a job feed and notify on new postings")]
struct Cli {
    /// RSS feed URL to poll
    #[arg(long, env = "UPFEED_FEED")]
    feed: String,

    /// Directory holding the daily snapshot files
    #[arg(long, env = "UPFEED_SAVE_DIR")]
    save_dir: PathBuf,

    /// Icon shown with each notification
    #[arg(long, env = "UPFEED_ICON", default_value = notify::DEFAULT_ICON)]
    icon: PathBuf,

    /// Skip feed items with a malformed date or price instead of stopping
    #[arg(long)]
    skip_malformed: bool,

    /// Log notifications instead of sending them to the desktop
    #[arg(long)]
    log_only: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    if cli.feed.trim().is_empty() {
        bail!("--feed must not be empty");
    }
    if cli.save_dir.as_os_str().is_empty() {
        bail!("--save-dir must not be empty");
    }

    if cli.log_only {
        watch(cli, LogNotifier).await
    } else {
        watch(cli, DesktopNotifier).await
    }
}

async fn watch<N: Notifier>(cli: Cli, notifier: N) -> Result<()> {
    let today = Local::now().date_naive();
    let unfiltered = SnapshotStore::load(&cli.save_dir, StorageCategory::Unfiltered, today)?;
    let filtered = SnapshotStore::load(&cli.save_dir, StorageCategory::Filtered, today)?;
    if !unfiltered.is_empty() {
        info!(postings = unfiltered.len(), "Resuming today's snapshot");
    }

    let policy = if cli.skip_malformed {
        FailurePolicy::SkipItem
    } else {
        FailurePolicy::Abort
    };

    info!(
        feed = %cli.feed,
        save_dir = ?cli.save_dir,
        day = %unfiltered.day(),
        ?policy,
        "Watching feed"
    );

    IngestLoop::new(
        HttpFeed::new(cli.feed),
        notifier,
        Classifier::default(),
        unfiltered,
        filtered,
        cli.icon,
    )
    .with_policy(policy)
    .run(POLL_INTERVAL)
    .await
}
