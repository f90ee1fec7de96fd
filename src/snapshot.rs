// src/snapshot.rs

use anyhow::{Context, Result};
use chrono::Utc;
use glob::glob;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Dashboard-ready JSON snapshots, one file per write, named
/// `<dataset>---<unix_micros>.json`. The dashboard reads the newest file per
/// dataset; everything older exists only until [`SnapshotStore::prune`].
/// Snapshots are derived, regenerable output, not a store of record.
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    /// Point the store at `dir`, creating it if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("creating snapshot directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    /// Serialize `value` as the newest snapshot of `dataset`.
    pub fn write<T: Serialize>(&self, dataset: &str, value: &T) -> Result<PathBuf> {
        let ts = Utc::now().timestamp_micros();
        let path = self.dir.join(format!("{}---{}.json", dataset, ts));
        let json = serde_json::to_string_pretty(value)
            .with_context(|| format!("serializing snapshot for {}", dataset))?;
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
        debug!(path = %path.display(), "wrote snapshot");
        Ok(path)
    }

    /// Path of the newest snapshot of `dataset`, if any.
    pub fn latest_path(&self, dataset: &str) -> Result<Option<PathBuf>> {
        Ok(self
            .scan(dataset)?
            .into_iter()
            .max_by_key(|(ts, _)| *ts)
            .map(|(_, path)| path))
    }

    /// Load and decode the newest snapshot of `dataset`.
    pub fn load_latest<T: DeserializeOwned>(&self, dataset: &str) -> Result<Option<T>> {
        let Some(path) = self.latest_path(dataset)? else {
            return Ok(None);
        };
        let text =
            fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        let value = serde_json::from_str(&text)
            .with_context(|| format!("decoding {}", path.display()))?;
        Ok(Some(value))
    }

    /// Delete all but the newest `keep` snapshots of `dataset`. Returns how
    /// many files were removed.
    pub fn prune(&self, dataset: &str, keep: usize) -> Result<usize> {
        let mut found = self.scan(dataset)?;
        found.sort_by_key(|(ts, _)| std::cmp::Reverse(*ts));

        let mut removed = 0;
        for (_, path) in found.into_iter().skip(keep) {
            fs::remove_file(&path).with_context(|| format!("removing {}", path.display()))?;
            removed += 1;
        }
        Ok(removed)
    }

    /// All `(timestamp, path)` snapshot files for `dataset`. Files whose name
    /// doesn't parse are ignored rather than failing the scan.
    fn scan(&self, dataset: &str) -> Result<Vec<(i64, PathBuf)>> {
        let pattern = format!("{}/{}---*.json", self.dir.display(), dataset);
        let mut found = Vec::new();
        for entry in glob(&pattern).context("invalid snapshot glob pattern")? {
            let path = match entry {
                Ok(p) => p,
                Err(_) => continue,
            };
            if let Some(ts) = parse_timestamp(&path, dataset) {
                found.push((ts, path));
            }
        }
        Ok(found)
    }
}

fn parse_timestamp(path: &Path, dataset: &str) -> Option<i64> {
    let stem = path.file_stem()?.to_str()?;
    stem.strip_prefix(dataset)?.strip_prefix("---")?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn write_then_load_latest_round_trips() -> Result<()> {
        let dir = tempdir()?;
        let store = SnapshotStore::new(dir.path())?;

        store.write("holdings", &json!({"records": 1}))?;
        let loaded: Option<serde_json::Value> = store.load_latest("holdings")?;
        assert_eq!(loaded, Some(json!({"records": 1})));
        Ok(())
    }

    #[test]
    fn latest_picks_the_highest_timestamp() -> Result<()> {
        let dir = tempdir()?;
        let store = SnapshotStore::new(dir.path())?;
        fs::write(dir.path().join("holdings---100.json"), "{\"v\":1}")?;
        fs::write(dir.path().join("holdings---200.json"), "{\"v\":2}")?;
        fs::write(dir.path().join("watchlist---300.json"), "{\"v\":3}")?;

        let latest = store.latest_path("holdings")?.expect("snapshot exists");
        assert!(latest.ends_with("holdings---200.json"));
        Ok(())
    }

    #[test]
    fn prune_keeps_only_the_newest() -> Result<()> {
        let dir = tempdir()?;
        let store = SnapshotStore::new(dir.path())?;
        for ts in [100, 200, 300] {
            fs::write(dir.path().join(format!("market---{}.json", ts)), "{}")?;
        }

        let removed = store.prune("market", 1)?;
        assert_eq!(removed, 2);
        let latest = store.latest_path("market")?.expect("snapshot exists");
        assert!(latest.ends_with("market---300.json"));
        Ok(())
    }

    #[test]
    fn unknown_dataset_has_no_latest() -> Result<()> {
        let dir = tempdir()?;
        let store = SnapshotStore::new(dir.path())?;
        assert!(store.latest_path("missing")?.is_none());
        Ok(())
    }
}
