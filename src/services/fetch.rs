// src/services/fetch.rs
use chrono::{Datelike, NaiveDate, Utc};
use regex::Regex;
use serde_json::json;

use crate::error::Result;
use crate::models::{DailySeries, Snapshot};
use crate::services::http_client::ApiClient;
use crate::services::totals::with_totals;

const NEW_HOMES_DAILY_URL: &str =
    "https://fdc.zjj.sz.gov.cn/api/marketInfoShow/getYsfCjxxGsDataNew";
const NEW_HOMES_MONTH_URL: &str =
    "https://zjj.sz.gov.cn:8004/api/marketInfoShow/getYsfCjxxGsMonthDataNew";
const SECOND_HAND_DAILY_URL: &str =
    "https://zjj.sz.gov.cn:8004/api/marketInfoShow/getEsfCjxxGsDataNew";
const SECOND_HAND_MONTH_URL: &str =
    "https://zjj.sz.gov.cn:8004/api/marketInfoShow/getEsfCjxxGsMonthDataNew";
const TRENDING_URL: &str = "https://zjj.sz.gov.cn:8004/api/marketInfoShow/getFjzsInfoData";

/// Previous day's new-home transactions by district, totals applied.
pub async fn new_homes_daily(client: &ApiClient) -> Result<Snapshot> {
    Ok(with_totals(client.post_json(NEW_HOMES_DAILY_URL, None).await?))
}

/// Previous month's new-home transactions by district, totals applied.
pub async fn new_homes_monthly(client: &ApiClient) -> Result<Snapshot> {
    Ok(with_totals(client.post_json(NEW_HOMES_MONTH_URL, None).await?))
}

/// Previous day's second-hand transactions by district, totals applied.
pub async fn second_hand_daily(client: &ApiClient) -> Result<Snapshot> {
    Ok(with_totals(client.post_json(SECOND_HAND_DAILY_URL, None).await?))
}

/// Previous month's second-hand transactions by district, totals applied.
pub async fn second_hand_monthly(client: &ApiClient) -> Result<Snapshot> {
    Ok(with_totals(client.post_json(SECOND_HAND_MONTH_URL, None).await?))
}

/// Daily time series over an inclusive "YYYY-MM-DD" date range.
pub async fn daily_series(
    client: &ApiClient,
    start_date: &str,
    end_date: &str,
) -> Result<DailySeries> {
    let body = json!({
        "startDate": start_date,
        "endDate": end_date,
        "dateType": "",
    });
    let response = client
        .post_json::<DailySeries>(TRENDING_URL, Some(&body))
        .await?;
    response.into_data()
}

/// Normalizes the portal's localized date labels to sortable keys:
/// "2025年9月12日" becomes "2025-09-12", "2025年9月" becomes "2025-09".
/// Returns None when the label has neither shape.
pub fn normalize_date_label(label: &str) -> Option<String> {
    let re = Regex::new(r"(\d{4})年(\d{1,2})月(?:(\d{1,2})日)?").ok()?;
    let caps = re.captures(label)?;
    let year = caps.get(1)?.as_str();
    let month: u32 = caps.get(2)?.as_str().parse().ok()?;
    match caps.get(3) {
        Some(day) => {
            let day: u32 = day.as_str().parse().ok()?;
            Some(format!("{year}-{month:02}-{day:02}"))
        }
        None => Some(format!("{year}-{month:02}")),
    }
}

/// The calendar month before today's, as (year, month). January rolls back
/// to December of the previous year.
pub fn previous_month() -> (i32, u32) {
    let today = Utc::now().date_naive();
    if today.month() == 1 {
        (today.year() - 1, 12)
    } else {
        (today.year(), today.month() - 1)
    }
}

/// Inclusive "YYYY-MM-DD" endpoints covering whole months from
/// (start_year, start_month) through (end_year, end_month).
pub fn month_range_dates(
    start_year: i32,
    start_month: u32,
    end_year: i32,
    end_month: u32,
) -> Option<(String, String)> {
    let start = NaiveDate::from_ymd_opt(start_year, start_month, 1)?;
    let next_month = if end_month == 12 {
        NaiveDate::from_ymd_opt(end_year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(end_year, end_month + 1, 1)?
    };
    let end = next_month.pred_opt()?;
    if end < start {
        return None;
    }
    Some((
        start.format("%Y-%m-%d").to_string(),
        end.format("%Y-%m-%d").to_string(),
    ))
}
