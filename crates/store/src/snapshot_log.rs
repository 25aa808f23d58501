// In crates/store/src/snapshot_log.rs

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use core_types::Snapshot;
use serde_json::Value;

use crate::{Error, Result};

/// An append-only, per-day log of fetched snapshots.
///
/// Each day gets its own `coingecko-YYYY-MM-DD.json` file holding a JSON
/// array of `{ timestamp, coins }` entries, oldest first.
#[derive(Debug, Clone)]
pub struct SnapshotLog {
    dir: PathBuf,
}

impl SnapshotLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The log file for a given UTC day.
    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(format!("coingecko-{}.json", date.format("%Y-%m-%d")))
    }

    pub fn today_path(&self) -> PathBuf {
        self.path_for(Utc::now().date_naive())
    }

    /// Appends a snapshot to the file of the day it was taken on.
    pub fn append(&self, snapshot: &Snapshot) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let date = snapshot.timestamp.unwrap_or_else(Utc::now).date_naive();
        let path = self.path_for(date);

        let mut entries = read_entries(&path)?;
        entries.push(serde_json::to_value(snapshot)?);
        fs::write(&path, serde_json::to_string_pretty(&entries)?)?;

        tracing::debug!(path = %path.display(), entries = entries.len(), "Snapshot appended to log.");
        Ok(path)
    }

    /// The most recent entry of today's log, if any.
    pub fn latest(&self) -> Result<Option<Snapshot>> {
        read_latest(&self.today_path())
    }
}

/// Reads the last entry of a log file. A missing or empty file yields `None`.
pub fn read_latest(path: &Path) -> Result<Option<Snapshot>> {
    let Some(last) = read_entries(path)?.pop() else {
        return Ok(None);
    };
    serde_json::from_value(last).map(Some).map_err(|e| Error::Corrupt {
        key: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn read_entries(path: &Path) -> Result<Vec<Value>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&content).map_err(|e| Error::Corrupt {
        key: path.display().to_string(),
        reason: e.to_string(),
    })
}
