use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate, Utc};
use tracing::{debug, info, warn};

use crate::classify::Classifier;
use crate::feed::FeedSource;
use crate::notify::Notifier;
use crate::parser;
use crate::posting::{zero_time, Posting};
use crate::store::SnapshotStore;

/// Pause between two feed polls.
pub const POLL_INTERVAL: Duration = Duration::from_secs(30);

pub const FILTERED_OUT_TITLE: &str = "Job filtered out";

/// What to do with an item whose recognized fields don't parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop the run on the first malformed item.
    #[default]
    Abort,
    /// Log it, count it, carry on with the rest of the cycle.
    SkipItem,
}

/// Counts for one pass over the feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub items: usize,
    pub new: usize,
    pub junk: usize,
    pub skipped: usize,
    pub errors: usize,
}

/// Poll → extract → store → classify → notify, one item at a time.
///
/// Owns both snapshot stores and the watermark, so a single loop instance is
/// the only writer for either file.
pub struct IngestLoop<F, N> {
    feed: F,
    notifier: N,
    classifier: Classifier,
    unfiltered: SnapshotStore,
    filtered: SnapshotStore,
    watermark: DateTime<Utc>,
    icon: PathBuf,
    policy: FailurePolicy,
}

impl<F: FeedSource, N: Notifier> IngestLoop<F, N> {
    pub fn new(
        feed: F,
        notifier: N,
        classifier: Classifier,
        unfiltered: SnapshotStore,
        filtered: SnapshotStore,
        icon: impl Into<PathBuf>,
    ) -> Self {
        IngestLoop {
            feed,
            notifier,
            classifier,
            unfiltered,
            filtered,
            watermark: zero_time(),
            icon: icon.into(),
            policy: FailurePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Latest `posted_on` treated as new so far in this run.
    #[cfg(test)]
    pub fn watermark(&self) -> DateTime<Utc> {
        self.watermark
    }

    #[cfg(test)]
    pub fn unfiltered(&self) -> &SnapshotStore {
        &self.unfiltered
    }

    #[cfg(test)]
    pub fn filtered(&self) -> &SnapshotStore {
        &self.filtered
    }

    /// Poll forever. Only returns on a fatal error.
    pub async fn run(mut self, interval: Duration) -> Result<()> {
        loop {
            self.run_cycle(Local::now().date_naive()).await?;
            tokio::time::sleep(interval).await;
        }
    }

    /// One pass over the feed. Items are handled in delivery order, so which
    /// ones count as new depends on that order, not on their timestamps.
    pub async fn run_cycle(&mut self, today: NaiveDate) -> Result<CycleReport> {
        self.unfiltered.roll_over(today)?;
        self.filtered.roll_over(today)?;

        let items = self.feed.fetch().await?;
        let mut report = CycleReport {
            items: items.len(),
            ..Default::default()
        };

        for item in items {
            let posting = match parser::extract(&item.title, &item.content) {
                Ok(p) => p,
                Err(e) if self.policy == FailurePolicy::SkipItem => {
                    warn!(title = %item.title, label = e.label(), error = %e, "Skipping malformed item");
                    report.errors += 1;
                    continue;
                }
                Err(e) => {
                    return Err(e).with_context(|| format!("Malformed feed item {:?}", item.title))
                }
            };
            self.ingest(posting, &mut report).await?;
        }

        if report.errors > 0 {
            warn!(errors = report.errors, "Cycle finished with malformed items");
        }
        info!(
            items = report.items,
            new = report.new,
            junk = report.junk,
            skipped = report.skipped,
            unfiltered = self.unfiltered.len(),
            filtered = self.filtered.len(),
            watermark = %self.watermark,
            "Cycle done"
        );
        Ok(report)
    }

    async fn ingest(&mut self, posting: Posting, report: &mut CycleReport) -> Result<()> {
        // Persist before anything else can fail for this item.
        self.unfiltered.upsert(posting.clone());
        self.unfiltered.save()?;

        if posting.posted_on <= self.watermark {
            debug!(title = %posting.title, posted_on = %posting.posted_on, "Already seen");
            report.skipped += 1;
            return Ok(());
        }
        self.watermark = posting.posted_on;
        report.new += 1;

        let verdict = self.classifier.classify(&posting);
        if verdict.is_junk() {
            info!(title = %posting.title, reason = verdict.reason(), "Filtered out");
            report.junk += 1;
            self.notifier
                .notify(FILTERED_OUT_TITLE, verdict.reason(), &self.icon)
                .await
                .context("Failed to notify about a filtered posting")?;
        } else {
            info!(
                title = %posting.title,
                country = %posting.country,
                hourly = posting.is_hourly(),
                "New posting"
            );
            let body = posting.format_body();
            self.filtered.upsert(posting.clone());
            self.filtered.save()?;
            self.notifier
                .notify(&posting.title, &body, &self.icon)
                .await
                .with_context(|| format!("Failed to notify about {:?}", posting.title))?;
        }
        Ok(())
    }
}
