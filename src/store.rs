use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info};

use crate::posting::Posting;

const FILE_PREFIX: &str = "upfeed";
const DAY_FORMAT: &str = "%d-%m-%Y";

/// Which snapshot a store holds. Unrelated to a posting's own category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageCategory {
    Unfiltered,
    Filtered,
}

impl StorageCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageCategory::Unfiltered => "unfiltered",
            StorageCategory::Filtered => "filtered",
        }
    }
}

impl fmt::Display for StorageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// File identity for one (day, category) pair: `upfeed_<DD-MM-YYYY>_<category>.json`.
pub fn snapshot_path(dir: &Path, day: NaiveDate, category: StorageCategory) -> PathBuf {
    dir.join(format!(
        "{}_{}_{}.json",
        FILE_PREFIX,
        day.format(DAY_FORMAT),
        category
    ))
}

/// Postings keyed by `posted_on`, backed by one JSON file per calendar day.
///
/// An upsert on an existing key replaces the whole posting. Every save
/// rewrites the day's file from scratch. A store only ever reflects its own
/// day: crossing midnight starts it over from whatever the new day's file
/// holds, which is nothing on a fresh day.
pub struct SnapshotStore {
    dir: PathBuf,
    category: StorageCategory,
    day: NaiveDate,
    postings: BTreeMap<DateTime<Utc>, Posting>,
}

impl SnapshotStore {
    /// Open the store for `day`. A missing file is an empty store; a file
    /// that exists but can't be read or decoded is an error.
    pub fn load(dir: impl Into<PathBuf>, category: StorageCategory, day: NaiveDate) -> Result<Self> {
        let dir = dir.into();
        let postings = read_snapshot(&snapshot_path(&dir, day, category))?;
        info!(%category, %day, postings = postings.len(), "Loaded snapshot");
        Ok(SnapshotStore {
            dir,
            category,
            day,
            postings,
        })
    }

    /// Insert or replace by `posted_on`. Returns the replaced posting, if any.
    pub fn upsert(&mut self, posting: Posting) -> Option<Posting> {
        self.postings.insert(posting.posted_on, posting)
    }

    /// Rewrite the day's file with every posting, newest first.
    pub fn save(&self) -> Result<()> {
        let path = self.path();
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create snapshot dir {:?}", self.dir))?;

        let sorted: Vec<&Posting> = self.postings().collect();
        let data = serde_json::to_vec(&sorted)
            .with_context(|| format!("Failed to encode {} snapshot", self.category))?;
        fs::write(&path, data).with_context(|| format!("Failed to write {:?}", path))?;

        debug!(path = ?path, postings = sorted.len(), "Saved snapshot");
        Ok(())
    }

    /// Move the store to `today` if the calendar day changed. The previous
    /// day's postings are dropped and today's file, if any, is loaded.
    pub fn roll_over(&mut self, today: NaiveDate) -> Result<bool> {
        if today == self.day {
            return Ok(false);
        }
        self.postings = read_snapshot(&snapshot_path(&self.dir, today, self.category))?;
        info!(
            category = %self.category,
            from = %self.day,
            to = %today,
            postings = self.postings.len(),
            "Snapshot rolled over to a new day"
        );
        self.day = today;
        Ok(true)
    }

    pub fn path(&self) -> PathBuf {
        snapshot_path(&self.dir, self.day, self.category)
    }

    pub fn day(&self) -> NaiveDate {
        self.day
    }

    /// All postings, newest `posted_on` first.
    pub fn postings(&self) -> impl Iterator<Item = &Posting> {
        self.postings.values().rev()
    }

    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }
}

fn read_snapshot(path: &Path) -> Result<BTreeMap<DateTime<Utc>, Posting>> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(e) => return Err(e).with_context(|| format!("Failed to read {:?}", path)),
    };

    // `null` is what an empty snapshot looked like in older files.
    let postings: Option<Vec<Posting>> = serde_json::from_slice(&data)
        .with_context(|| format!("Malformed snapshot {:?}", path))?;

    Ok(postings
        .unwrap_or_default()
        .into_iter()
        .map(|p| (p.posted_on, p))
        .collect())
}
