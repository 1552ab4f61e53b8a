// src/services/postprocess.rs
use log::{error, info};
use std::fs;

use crate::config::DataConfig;
use crate::models::Category;
use crate::services::store::{collect_json_files, load_snapshot};
use crate::services::totals::with_totals;

/// Outcome of one batch run over the stored snapshots.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ProcessReport {
    pub processed: usize,
    pub skipped: usize,
}

/// (Re)applies the totals calculator to every stored snapshot across the four
/// category directories.
///
/// Without `force`, files that already carry totals are skipped. A file that
/// fails to parse or write is logged and left alone; one bad file never
/// aborts the batch.
pub fn process_existing(config: &DataConfig, force: bool) -> ProcessReport {
    let mut report = ProcessReport::default();

    for category in Category::ALL {
        let dir = config.category_dir(category);
        if !dir.is_dir() {
            info!("directory {} does not exist, skipping", dir.display());
            continue;
        }

        for path in collect_json_files(&dir) {
            let snapshot = match load_snapshot(&path) {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    error!("error processing {}: {}", path.display(), e);
                    continue;
                }
            };

            if !force
                && snapshot
                    .data
                    .as_ref()
                    .is_some_and(|data| data.has_totals())
            {
                info!("{} already has total statistics, skipping", path.display());
                report.skipped += 1;
                continue;
            }

            let updated = with_totals(snapshot);
            let body = match serde_json::to_string_pretty(&updated) {
                Ok(body) => body,
                Err(e) => {
                    error!("error serializing {}: {}", path.display(), e);
                    continue;
                }
            };
            if let Err(e) = fs::write(&path, body) {
                error!("error writing {}: {}", path.display(), e);
                continue;
            }

            if let Some(data) = updated.data.as_ref() {
                info!(
                    "processed {} - total mj: {:?}, total ts: {:?}",
                    path.display(),
                    data.data_total_mj,
                    data.data_total_ts
                );
            }
            report.processed += 1;
        }
    }

    info!(
        "processing completed: {} processed, {} skipped",
        report.processed, report.skipped
    );
    report
}
