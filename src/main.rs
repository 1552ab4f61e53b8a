use anyhow::{anyhow, bail, Result};
use dotenv::dotenv;
use log::info;

use housing_stats::config::DataConfig;
use housing_stats::models::{Category, Snapshot};
use housing_stats::services::http_client::ApiClient;
use housing_stats::services::{fetch, store, trending};

/// Daily run: fetch the four previous-day / previous-month snapshots one at a
/// time, persist them, then refresh the trending store for the previous
/// calendar month. Strictly sequential; the first failure stops the run so a
/// partial batch is never silently left behind.
#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();
    info!("starting daily housing data run");

    let config = DataConfig::from_env();
    let client = ApiClient::new()?;

    info!("fetching previous day second-hand home data");
    let snapshot = fetch::second_hand_daily(&client).await?;
    persist(&config, snapshot, Category::SecondHandHomes)?;

    info!("fetching previous day new home data");
    let snapshot = fetch::new_homes_daily(&client).await?;
    persist(&config, snapshot, Category::NewHomes)?;

    info!("fetching previous month second-hand home data");
    let snapshot = fetch::second_hand_monthly(&client).await?;
    persist(&config, snapshot, Category::SecondHandHomesMonth)?;

    info!("fetching previous month new home data");
    let snapshot = fetch::new_homes_monthly(&client).await?;
    persist(&config, snapshot, Category::NewHomesMonth)?;

    let (year, month) = fetch::previous_month();
    info!("refreshing trending data for {year}-{month:02}");
    trending::update_trending(&client, &config, year, month, year, month).await?;

    info!("data fetching and saving completed");
    Ok(())
}

/// Names the snapshot file after the normalized date label carried in the
/// response and writes it under its category directory.
fn persist(config: &DataConfig, snapshot: Snapshot, category: Category) -> Result<()> {
    if !snapshot.is_ok() {
        bail!("error fetching {} data: {}", category, snapshot.message());
    }

    let label = snapshot
        .data
        .as_ref()
        .and_then(|data| match category {
            Category::NewHomesMonth | Category::SecondHandHomesMonth => {
                data.xml_date_month.clone()
            }
            _ => data.xml_date_day.clone(),
        })
        .ok_or_else(|| anyhow!("{} response carried no date label", category))?;

    let date = fetch::normalize_date_label(&label)
        .ok_or_else(|| anyhow!("unrecognized {} date label: {label}", category))?;

    store::save_snapshot(config, &snapshot, category, &date)?;
    Ok(())
}
