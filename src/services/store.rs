// src/services/store.rs
use log::{info, warn};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::DataConfig;
use crate::error::{Error, Result};
use crate::models::{Category, Snapshot, SnapshotData};

/// Writes one snapshot to `<data_dir>/<category>/<date>.json`, creating the
/// directory on demand.
pub fn save_snapshot(
    config: &DataConfig,
    snapshot: &Snapshot,
    category: Category,
    date: &str,
) -> Result<PathBuf> {
    let dir = config.category_dir(category);
    fs::create_dir_all(&dir).map_err(|e| Error::io(dir.display().to_string(), e))?;

    let path = config.snapshot_path(category, date);
    let body = serde_json::to_string_pretty(snapshot)
        .map_err(|e| Error::parse(path.display().to_string(), e))?;
    fs::write(&path, body).map_err(|e| Error::io(path.display().to_string(), e))?;
    info!("saved {} snapshot to {}", category, path.display());
    Ok(path)
}

pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let content =
        fs::read_to_string(path).map_err(|e| Error::io(path.display().to_string(), e))?;
    serde_json::from_str(&content).map_err(|e| Error::parse(path.display().to_string(), e))
}

/// Every `.json` file under `dir`, recursing into date-based subfolders.
/// A missing directory yields an empty list rather than an error.
pub fn collect_json_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return files,
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            files.extend(collect_json_files(&path));
        } else if path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files
}

/// Maps a date to optional snapshot content for one category. Lets the
/// reshaper run against the filesystem in production and plain maps in tests.
pub trait SnapshotSource {
    /// Distinct dates observed in this source.
    fn dates(&self) -> Vec<String>;

    /// Snapshot content for a date; None when absent or unreadable.
    fn load(&self, date: &str) -> Option<SnapshotData>;
}

/// Filesystem-backed source: file stems are dates, discovery is recursive.
pub struct FsSnapshotSource {
    files: HashMap<String, PathBuf>,
}

impl FsSnapshotSource {
    pub fn open(dir: &Path) -> Self {
        let files = collect_json_files(dir)
            .into_iter()
            .filter_map(|path| {
                let stem = path.file_stem()?.to_str()?.to_string();
                Some((stem, path))
            })
            .collect();
        FsSnapshotSource { files }
    }

    pub fn for_category(config: &DataConfig, category: Category) -> Self {
        Self::open(&config.category_dir(category))
    }
}

impl SnapshotSource for FsSnapshotSource {
    fn dates(&self) -> Vec<String> {
        self.files.keys().cloned().collect()
    }

    fn load(&self, date: &str) -> Option<SnapshotData> {
        let path = self.files.get(date)?;
        match load_snapshot(path) {
            Ok(snapshot) => snapshot.data,
            Err(e) => {
                // One bad day must not abort a reshape over years of history.
                warn!("skipping unreadable snapshot: {}", e);
                None
            }
        }
    }
}
