// src/services/totals.rs
use crate::models::Snapshot;

/// Round to 2 decimal places, half away from zero. Used for every persisted
/// area figure to keep floating-point noise out of the stored JSON.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Derives `dataTotalMj` and `dataTotalTs` for a snapshot.
///
/// A failed response, or one whose `dataMj`/`dataTs` are absent, is returned
/// unchanged: absence of data is a legitimate "no transactions" state, not an
/// error. Transaction counts are summed as integers; fractional counts are
/// not meaningful in this domain.
pub fn with_totals(mut snapshot: Snapshot) -> Snapshot {
    if !snapshot.is_ok() {
        return snapshot;
    }
    if let Some(data) = snapshot.data.as_mut() {
        if let (Some(mj), Some(ts)) = (data.data_mj.as_ref(), data.data_ts.as_ref()) {
            let total_mj: f64 = mj.iter().map(|d| d.value.unwrap_or(0.0)).sum();
            let total_ts: i64 = ts.iter().map(|d| d.value.unwrap_or(0.0) as i64).sum();
            data.data_total_mj = Some(round2(total_mj));
            data.data_total_ts = Some(total_ts);
        }
    }
    snapshot
}
