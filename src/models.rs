// src/models.rs
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// `status` value the portal uses for a successful response.
pub const STATUS_OK: i64 = 1;

/// The four snapshot categories, each backed by its own directory
/// under the data root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    NewHomes,
    SecondHandHomes,
    NewHomesMonth,
    SecondHandHomesMonth,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::NewHomes,
        Category::NewHomesMonth,
        Category::SecondHandHomes,
        Category::SecondHandHomesMonth,
    ];

    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::NewHomes => "new_homes",
            Category::SecondHandHomes => "second_hand_homes",
            Category::NewHomesMonth => "new_homes_month",
            Category::SecondHandHomesMonth => "second_hand_homes_month",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Response envelope shared by every portal endpoint: `status == 1` signals
/// success, anything else carries the failure text in `msg`. Unknown envelope
/// fields are kept so persisted snapshots round-trip untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiResponse<T> {
    pub status: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl<T> ApiResponse<T> {
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }

    /// Upstream failure text, or a placeholder when the portal sent none.
    pub fn message(&self) -> &str {
        self.msg.as_deref().unwrap_or("(no message)")
    }

    /// Unwraps a successful envelope into its payload; a failed status or a
    /// success with no payload is an `Upstream` error.
    pub fn into_data(self) -> crate::error::Result<T> {
        if !self.is_ok() {
            return Err(crate::error::Error::Upstream(self.message().to_string()));
        }
        self.data
            .ok_or_else(|| crate::error::Error::Upstream("response carried no data".to_string()))
    }
}

/// One persisted API response for one date and category.
pub type Snapshot = ApiResponse<SnapshotData>;

/// The `data` bag of a snapshot. All fields are optional: a response with no
/// transactions legitimately omits them, and the totals only exist after the
/// totals calculator has run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotData {
    /// Localized day label, e.g. "2025年9月12日".
    #[serde(rename = "xmlDateDay", default, skip_serializing_if = "Option::is_none")]
    pub xml_date_day: Option<String>,
    /// Localized month label, e.g. "2025年9月".
    #[serde(rename = "xmlDateMonth", default, skip_serializing_if = "Option::is_none")]
    pub xml_date_month: Option<String>,
    /// Deal area per district, in square meters.
    #[serde(rename = "dataMj", default, skip_serializing_if = "Option::is_none")]
    pub data_mj: Option<Vec<DistrictValue>>,
    /// Transaction count per district.
    #[serde(rename = "dataTs", default, skip_serializing_if = "Option::is_none")]
    pub data_ts: Option<Vec<DistrictValue>>,
    #[serde(rename = "dataTotalMj", default, skip_serializing_if = "Option::is_none")]
    pub data_total_mj: Option<f64>,
    #[serde(rename = "dataTotalTs", default, skip_serializing_if = "Option::is_none")]
    pub data_total_ts: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SnapshotData {
    pub fn has_totals(&self) -> bool {
        self.data_total_mj.is_some() || self.data_total_ts.is_some()
    }
}

/// One `{name, value}` entry of `dataMj` or `dataTs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistrictValue {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

impl DistrictValue {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        DistrictValue {
            name: name.into(),
            value: Some(value),
        }
    }
}

/// Daily time series returned by the trending endpoint: parallel arrays,
/// index i across all of them refers to `date[i]`. Entries can be null.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DailySeries {
    #[serde(default)]
    pub date: Vec<String>,
    #[serde(rename = "ysfDealArea", default)]
    pub ysf_deal_area: Vec<Option<f64>>,
    #[serde(rename = "ysfTotalTs", default)]
    pub ysf_total_ts: Vec<Option<f64>>,
    #[serde(rename = "esfDealArea", default)]
    pub esf_deal_area: Vec<Option<f64>>,
    #[serde(rename = "esfTotalTs", default)]
    pub esf_total_ts: Vec<Option<f64>>,
}

/// One month's sums in the trending store, keyed by "YYYY-MM". `ysf` is the
/// new-home (first-hand) series, `esf` second-hand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyAggregate {
    #[serde(rename = "ysfDealArea")]
    pub ysf_deal_area: f64,
    #[serde(rename = "ysfTotalTs")]
    pub ysf_total_ts: i64,
    #[serde(rename = "esfDealArea")]
    pub esf_deal_area: f64,
    #[serde(rename = "esfTotalTs")]
    pub esf_total_ts: i64,
    #[serde(rename = "ysfAverageArea", default)]
    pub ysf_average_area: f64,
    #[serde(rename = "esfAverageArea", default)]
    pub esf_average_area: f64,
}

/// The month-keyed trending store. BTreeMap keeps keys in ascending string
/// order, which is chronological for the "YYYY-MM" format.
pub type TrendingStore = BTreeMap<String, MonthlyAggregate>;

/// Dense per-district daily matrix consumed by the chart front end. Every
/// inner array has exactly `dates.len()` entries, positionally aligned with
/// `dates`, zero-filled where a date or district has no observation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendMatrix {
    pub dates: Vec<String>,
    pub districts: BTreeMap<String, DistrictSeries>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DistrictSeries {
    pub new_homes: CategorySeries,
    pub second_hand_homes: CategorySeries,
}

/// Transaction counts and deal areas for one district in one category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategorySeries {
    pub ts: Vec<i64>,
    pub mj: Vec<f64>,
}
