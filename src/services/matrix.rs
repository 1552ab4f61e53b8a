// src/services/matrix.rs
use anyhow::Context;
use log::{info, warn};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;

use crate::config::DataConfig;
use crate::models::{Category, DistrictSeries, TrendMatrix};
use crate::services::store::{FsSnapshotSource, SnapshotSource};

/// District-keyed values observed on one date for one category.
#[derive(Default)]
struct DayValues {
    ts: HashMap<String, f64>,
    mj: HashMap<String, f64>,
}

fn collect_by_date(
    source: &dyn SnapshotSource,
    dates: &[String],
    districts: &mut BTreeSet<String>,
) -> HashMap<String, DayValues> {
    let mut by_date = HashMap::new();
    for date in dates {
        let mut values = DayValues::default();
        // A date missing from this category stays an empty DayValues and
        // zero-fills below.
        if let Some(data) = source.load(date) {
            for item in data.data_ts.unwrap_or_default() {
                districts.insert(item.name.clone());
                values.ts.insert(item.name, item.value.unwrap_or(0.0));
            }
            for item in data.data_mj.unwrap_or_default() {
                districts.insert(item.name.clone());
                values.mj.insert(item.name, item.value.unwrap_or(0.0));
            }
        }
        by_date.insert(date.clone(), values);
    }
    by_date
}

/// Reshapes the per-date snapshots of both daily categories into one dense
/// matrix: the sorted union of all observed dates, the sorted union of all
/// observed districts, and per (district, category, metric) an array aligned
/// to the date list, zero-filled where no observation exists.
pub fn build_matrix(
    new_homes: &dyn SnapshotSource,
    second_hand: &dyn SnapshotSource,
) -> TrendMatrix {
    let mut date_set: BTreeSet<String> = new_homes.dates().into_iter().collect();
    date_set.extend(second_hand.dates());
    let dates: Vec<String> = date_set.into_iter().collect();

    let mut districts = BTreeSet::new();
    let new_by_date = collect_by_date(new_homes, &dates, &mut districts);
    let second_by_date = collect_by_date(second_hand, &dates, &mut districts);

    let mut matrix = TrendMatrix {
        dates: dates.clone(),
        districts: BTreeMap::new(),
    };

    for district in &districts {
        let mut series = DistrictSeries::default();
        for date in &dates {
            let new_day = &new_by_date[date];
            let second_day = &second_by_date[date];
            series
                .new_homes
                .ts
                .push(new_day.ts.get(district).copied().unwrap_or(0.0) as i64);
            series
                .new_homes
                .mj
                .push(new_day.mj.get(district).copied().unwrap_or(0.0));
            series
                .second_hand_homes
                .ts
                .push(second_day.ts.get(district).copied().unwrap_or(0.0) as i64);
            series
                .second_hand_homes
                .mj
                .push(second_day.mj.get(district).copied().unwrap_or(0.0));
        }
        matrix.districts.insert(district.clone(), series);
    }

    matrix
}

/// Regenerates the two JSON feeds the chart front end reads: the dense daily
/// matrix, and a copy of the trending store. A missing trending store is
/// logged and skipped; the matrix is still produced.
pub fn write_ui_data(config: &DataConfig) -> anyhow::Result<()> {
    info!("processing UI data");
    fs::create_dir_all(&config.ui_data_dir)
        .with_context(|| format!("creating {}", config.ui_data_dir.display()))?;

    let trending = config.trending_path();
    let ui_trending = config.ui_trending_path();
    match fs::copy(&trending, &ui_trending) {
        Ok(_) => info!("copied {} to {}", trending.display(), ui_trending.display()),
        Err(e) => warn!("could not copy {}: {}", trending.display(), e),
    }

    let new_homes = FsSnapshotSource::for_category(config, Category::NewHomes);
    let second_hand = FsSnapshotSource::for_category(config, Category::SecondHandHomes);
    let matrix = build_matrix(&new_homes, &second_hand);

    let path = config.ui_daily_matrix_path();
    let body = serde_json::to_string_pretty(&matrix)?;
    fs::write(&path, body).with_context(|| format!("writing {}", path.display()))?;
    info!(
        "generated {} ({} dates, {} districts)",
        path.display(),
        matrix.dates.len(),
        matrix.districts.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DistrictValue, SnapshotData, Snapshot, STATUS_OK};
    use crate::services::store::save_snapshot;
    use tempfile::tempdir;

    struct MemorySource(HashMap<String, SnapshotData>);

    impl MemorySource {
        fn new(entries: Vec<(&str, SnapshotData)>) -> Self {
            MemorySource(
                entries
                    .into_iter()
                    .map(|(date, data)| (date.to_string(), data))
                    .collect(),
            )
        }
    }

    impl SnapshotSource for MemorySource {
        fn dates(&self) -> Vec<String> {
            self.0.keys().cloned().collect()
        }

        fn load(&self, date: &str) -> Option<SnapshotData> {
            self.0.get(date).cloned()
        }
    }

    fn day(district: &str, ts: f64, mj: f64) -> SnapshotData {
        SnapshotData {
            data_ts: Some(vec![DistrictValue::new(district, ts)]),
            data_mj: Some(vec![DistrictValue::new(district, mj)]),
            ..Default::default()
        }
    }

    #[test]
    fn dates_are_the_union_of_both_categories() {
        let new_homes = MemorySource::new(vec![("2024-01-01", day("南山", 3.0, 120.0))]);
        let second_hand = MemorySource::new(vec![("2024-01-02", day("福田", 5.0, 480.5))]);

        let matrix = build_matrix(&new_homes, &second_hand);
        assert_eq!(matrix.dates, ["2024-01-01", "2024-01-02"]);
        assert_eq!(
            matrix.districts.keys().collect::<Vec<_>>(),
            ["南山", "福田"]
        );

        // Every array is aligned to the two dates, zeros where the
        // category/date pair has no snapshot.
        let nanshan = &matrix.districts["南山"];
        assert_eq!(nanshan.new_homes.ts, [3, 0]);
        assert_eq!(nanshan.new_homes.mj, [120.0, 0.0]);
        assert_eq!(nanshan.second_hand_homes.ts, [0, 0]);
        assert_eq!(nanshan.second_hand_homes.mj, [0.0, 0.0]);

        let futian = &matrix.districts["福田"];
        assert_eq!(futian.new_homes.ts, [0, 0]);
        assert_eq!(futian.second_hand_homes.ts, [0, 5]);
        assert_eq!(futian.second_hand_homes.mj, [0.0, 480.5]);
    }

    #[test]
    fn district_absent_from_one_date_is_zero_filled() {
        let new_homes = MemorySource::new(vec![
            ("2024-01-01", day("南山", 2.0, 80.0)),
            (
                "2024-01-02",
                SnapshotData {
                    data_ts: Some(vec![
                        DistrictValue::new("南山", 4.0),
                        DistrictValue::new("宝安", 1.0),
                    ]),
                    data_mj: Some(vec![
                        DistrictValue::new("南山", 160.0),
                        DistrictValue::new("宝安", 55.5),
                    ]),
                    ..Default::default()
                },
            ),
        ]);
        let second_hand = MemorySource::new(vec![]);

        let matrix = build_matrix(&new_homes, &second_hand);
        assert_eq!(matrix.districts["宝安"].new_homes.ts, [0, 1]);
        assert_eq!(matrix.districts["宝安"].new_homes.mj, [0.0, 55.5]);
        assert_eq!(matrix.districts["南山"].new_homes.ts, [2, 4]);
    }

    #[test]
    fn empty_sources_produce_an_empty_matrix() {
        let matrix = build_matrix(&MemorySource::new(vec![]), &MemorySource::new(vec![]));
        assert!(matrix.dates.is_empty());
        assert!(matrix.districts.is_empty());
    }

    #[test]
    fn ui_feed_tolerates_corrupt_snapshots_and_missing_store() {
        let dir = tempdir().unwrap();
        let config = DataConfig::with_data_dir(dir.path());

        let snapshot = Snapshot {
            status: STATUS_OK,
            msg: None,
            data: Some(day("罗湖", 7.0, 310.25)),
            extra: Default::default(),
        };
        save_snapshot(&config, &snapshot, Category::NewHomes, "2024-02-01").unwrap();

        // A corrupt second-hand file for another date: its date still appears
        // in the union, with zero-filled values.
        let second_dir = config.category_dir(Category::SecondHandHomes);
        fs::create_dir_all(&second_dir).unwrap();
        fs::write(second_dir.join("2024-02-02.json"), "{ broken").unwrap();

        write_ui_data(&config).unwrap();

        let body = fs::read_to_string(config.ui_daily_matrix_path()).unwrap();
        let matrix: TrendMatrix = serde_json::from_str(&body).unwrap();
        assert_eq!(matrix.dates, ["2024-02-01", "2024-02-02"]);
        assert_eq!(matrix.districts["罗湖"].new_homes.ts, [7, 0]);
        assert_eq!(matrix.districts["罗湖"].second_hand_homes.mj, [0.0, 0.0]);
    }
}
