// src/config.rs
use std::env;
use std::path::PathBuf;

use crate::models::Category;

/// Filesystem layout of the data store. Built once per run (from the
/// environment or a fixture directory) and passed into every component, so
/// nothing depends on the process working directory implicitly.
#[derive(Debug, Clone)]
pub struct DataConfig {
    /// Root holding the four category directories and trending.json.
    pub data_dir: PathBuf,
    /// Directory the chart front end reads its JSON feeds from.
    pub ui_data_dir: PathBuf,
}

impl DataConfig {
    /// Reads `DATA_DIR` (default "data") and `UI_DATA_DIR` (default "ui/src").
    pub fn from_env() -> Self {
        let data_dir = PathBuf::from(env::var("DATA_DIR").unwrap_or_else(|_| "data".into()));
        let ui_data_dir =
            PathBuf::from(env::var("UI_DATA_DIR").unwrap_or_else(|_| "ui/src".into()));
        DataConfig {
            data_dir,
            ui_data_dir,
        }
    }

    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        let ui_data_dir = data_dir.join("ui");
        DataConfig {
            data_dir,
            ui_data_dir,
        }
    }

    pub fn category_dir(&self, category: Category) -> PathBuf {
        self.data_dir.join(category.dir_name())
    }

    pub fn snapshot_path(&self, category: Category, date: &str) -> PathBuf {
        self.category_dir(category).join(format!("{date}.json"))
    }

    /// The month-keyed trending store.
    pub fn trending_path(&self) -> PathBuf {
        self.data_dir.join("trending.json")
    }

    /// Copy of the trending store placed next to the UI sources.
    pub fn ui_trending_path(&self) -> PathBuf {
        self.ui_data_dir.join("trendingData.json")
    }

    /// Dense daily matrix consumed by the UI.
    pub fn ui_daily_matrix_path(&self) -> PathBuf {
        self.ui_data_dir.join("trendingDailyData.json")
    }
}
