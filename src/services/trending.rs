// src/services/trending.rs
use anyhow::{anyhow, Context};
use log::info;
use std::fs;
use std::path::Path;

use crate::config::DataConfig;
use crate::error::{Error, Result};
use crate::models::{DailySeries, TrendingStore};
use crate::services::fetch;
use crate::services::http_client::ApiClient;
use crate::services::totals::round2;

fn at(values: &[Option<f64>], i: usize) -> f64 {
    values.get(i).copied().flatten().unwrap_or(0.0)
}

/// Groups a daily series by calendar month ("YYYY-MM" = first 7 chars of the
/// date) and sums each metric. Counts accumulate as integers. After
/// accumulation the average area per transaction is derived (0 for months
/// without transactions) and the area figures rounded to 2 decimals.
pub fn aggregate_monthly(series: &DailySeries) -> TrendingStore {
    let mut months = TrendingStore::new();

    for (i, date) in series.date.iter().enumerate() {
        let key = date.get(..7).unwrap_or(date.as_str()).to_string();
        let entry = months.entry(key).or_default();
        entry.ysf_deal_area += at(&series.ysf_deal_area, i);
        entry.ysf_total_ts += at(&series.ysf_total_ts, i) as i64;
        entry.esf_deal_area += at(&series.esf_deal_area, i);
        entry.esf_total_ts += at(&series.esf_total_ts, i) as i64;
    }

    for entry in months.values_mut() {
        // Averages come from the unrounded sums.
        let ysf_average = if entry.ysf_total_ts > 0 {
            entry.ysf_deal_area / entry.ysf_total_ts as f64
        } else {
            0.0
        };
        let esf_average = if entry.esf_total_ts > 0 {
            entry.esf_deal_area / entry.esf_total_ts as f64
        } else {
            0.0
        };
        entry.ysf_deal_area = round2(entry.ysf_deal_area);
        entry.esf_deal_area = round2(entry.esf_deal_area);
        entry.ysf_average_area = round2(ysf_average);
        entry.esf_average_area = round2(esf_average);
    }

    months
}

/// Reads the month-keyed store. An absent file is an empty store; a present
/// but malformed file is fatal, since silently dropping history is worse
/// than stopping.
pub fn read_store(path: &Path) -> Result<TrendingStore> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(TrendingStore::new()),
        Err(e) => return Err(Error::io(path.display().to_string(), e)),
    };
    serde_json::from_str(&content).map_err(|e| Error::parse(path.display().to_string(), e))
}

/// Rewrites the whole store. BTreeMap serialization keeps the month keys in
/// ascending order.
pub fn write_store(path: &Path, store: &TrendingStore) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent.display().to_string(), e))?;
    }
    let body = serde_json::to_string_pretty(store)
        .map_err(|e| Error::parse(path.display().to_string(), e))?;
    fs::write(path, body).map_err(|e| Error::io(path.display().to_string(), e))?;
    info!("updated {}", path.display());
    Ok(())
}

/// Overlays freshly aggregated months onto the on-disk store and rewrites it.
/// An already-recorded month is replaced wholesale, so re-running over an
/// overlapping range never duplicates or double-counts.
pub fn merge_into_store(path: &Path, months: TrendingStore) -> Result<TrendingStore> {
    let mut store = read_store(path)?;
    for (key, entry) in months {
        info!("processed trending data for {}", key);
        store.insert(key, entry);
    }
    write_store(path, &store)?;
    Ok(store)
}

/// Fetches the daily series covering the given month range, aggregates it and
/// merges the result into the trending store.
pub async fn update_trending(
    client: &ApiClient,
    config: &DataConfig,
    start_year: i32,
    start_month: u32,
    end_year: i32,
    end_month: u32,
) -> anyhow::Result<()> {
    let (start_date, end_date) =
        fetch::month_range_dates(start_year, start_month, end_year, end_month).ok_or_else(
            || anyhow!("invalid month range {start_year}-{start_month} .. {end_year}-{end_month}"),
        )?;
    info!("fetching trending data for {} .. {}", start_date, end_date);

    let series = fetch::daily_series(client, &start_date, &end_date).await?;
    if series.date.is_empty() {
        info!("no data returned for the requested range");
        return Ok(());
    }

    let months = aggregate_monthly(&series);
    let store = merge_into_store(&config.trending_path(), months)
        .context("failed to update trending store")?;
    info!("trending store now holds {} month(s)", store.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MonthlyAggregate;
    use tempfile::tempdir;

    fn series(
        dates: &[&str],
        ysf_area: &[f64],
        ysf_ts: &[f64],
        esf_area: &[f64],
        esf_ts: &[f64],
    ) -> DailySeries {
        DailySeries {
            date: dates.iter().map(|d| d.to_string()).collect(),
            ysf_deal_area: ysf_area.iter().copied().map(Some).collect(),
            ysf_total_ts: ysf_ts.iter().copied().map(Some).collect(),
            esf_deal_area: esf_area.iter().copied().map(Some).collect(),
            esf_total_ts: esf_ts.iter().copied().map(Some).collect(),
        }
    }

    #[test]
    fn aggregates_across_month_boundary() {
        let input = series(
            &["2024-01-30", "2024-01-31", "2024-02-01"],
            &[10.0, 20.0, 30.0],
            &[1.0, 2.0, 3.0],
            &[0.0, 0.0, 0.0],
            &[0.0, 0.0, 0.0],
        );
        let months = aggregate_monthly(&input);
        assert_eq!(months.len(), 2);

        let jan = &months["2024-01"];
        assert_eq!(jan.ysf_deal_area, 30.0);
        assert_eq!(jan.ysf_total_ts, 3);
        assert_eq!(jan.ysf_average_area, 10.0);

        let feb = &months["2024-02"];
        assert_eq!(feb.ysf_deal_area, 30.0);
        assert_eq!(feb.ysf_total_ts, 3);
        assert_eq!(feb.ysf_average_area, 10.0);
    }

    #[test]
    fn aggregation_is_order_independent() {
        let forward = series(
            &["2024-01-01", "2024-01-02", "2024-01-03"],
            &[1.5, 2.25, 3.75],
            &[1.0, 2.0, 3.0],
            &[4.0, 5.0, 6.0],
            &[2.0, 2.0, 2.0],
        );
        let shuffled = series(
            &["2024-01-03", "2024-01-01", "2024-01-02"],
            &[3.75, 1.5, 2.25],
            &[3.0, 1.0, 2.0],
            &[6.0, 4.0, 5.0],
            &[2.0, 2.0, 2.0],
        );
        assert_eq!(aggregate_monthly(&forward), aggregate_monthly(&shuffled));
    }

    #[test]
    fn zero_transactions_yield_zero_average() {
        let input = series(&["2024-03-01"], &[0.0, 0.0], &[0.0], &[0.0], &[0.0]);
        let months = aggregate_monthly(&input);
        let march = &months["2024-03"];
        assert_eq!(march.ysf_average_area, 0.0);
        assert_eq!(march.esf_average_area, 0.0);
    }

    #[test]
    fn short_arrays_read_as_zero() {
        let input = DailySeries {
            date: vec!["2024-04-01".into(), "2024-04-02".into()],
            ysf_deal_area: vec![Some(12.0)],
            ysf_total_ts: vec![Some(2.0), None],
            ..Default::default()
        };
        let months = aggregate_monthly(&input);
        let april = &months["2024-04"];
        assert_eq!(april.ysf_deal_area, 12.0);
        assert_eq!(april.ysf_total_ts, 2);
        assert_eq!(april.esf_deal_area, 0.0);
    }

    #[test]
    fn merge_overwrites_existing_months() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("trending.json");

        let mut first = TrendingStore::new();
        first.insert(
            "2024-01".into(),
            MonthlyAggregate {
                ysf_deal_area: 1.0,
                ysf_total_ts: 1,
                ..Default::default()
            },
        );
        merge_into_store(&path, first).unwrap();

        let mut second = TrendingStore::new();
        second.insert(
            "2024-01".into(),
            MonthlyAggregate {
                ysf_deal_area: 99.0,
                ysf_total_ts: 9,
                ..Default::default()
            },
        );
        let merged = merge_into_store(&path, second).unwrap();

        assert_eq!(merged["2024-01"].ysf_deal_area, 99.0);
        assert_eq!(merged["2024-01"].ysf_total_ts, 9);
        assert_eq!(read_store(&path).unwrap(), merged);
    }

    #[test]
    fn store_keys_serialize_in_ascending_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("trending.json");

        let mut months = TrendingStore::new();
        for key in ["2024-03", "2023-12", "2024-01"] {
            months.insert(key.into(), MonthlyAggregate::default());
        }
        merge_into_store(&path, months).unwrap();

        let body = fs::read_to_string(&path).unwrap();
        let positions: Vec<usize> = ["2023-12", "2024-01", "2024-03"]
            .iter()
            .map(|k| body.find(k).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn absent_store_reads_as_empty() {
        let dir = tempdir().unwrap();
        let store = read_store(&dir.path().join("missing.json")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn corrupt_store_is_fatal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("trending.json");
        fs::write(&path, "{ definitely not json").unwrap();

        match read_store(&path) {
            Err(Error::Parse { .. }) => {}
            other => panic!("expected parse error, got {:?}", other),
        }
    }
}
