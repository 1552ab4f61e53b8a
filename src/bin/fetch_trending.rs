// src/bin/fetch_trending.rs
use anyhow::{bail, Result};
use clap::Parser;
use dotenv::dotenv;

use housing_stats::config::DataConfig;
use housing_stats::services::http_client::ApiClient;
use housing_stats::services::trending::update_trending;

/// Backfills the monthly trending store over an inclusive month range.
#[derive(Parser)]
struct Args {
    /// First month, as YYYY-MM.
    start: String,
    /// Last month, as YYYY-MM.
    end: String,
}

fn parse_month(value: &str) -> Result<(i32, u32)> {
    let Some((year, month)) = value.split_once('-') else {
        bail!("invalid month {value:?}, expected YYYY-MM");
    };
    let year: i32 = year.parse()?;
    let month: u32 = month.parse()?;
    if !(1..=12).contains(&month) {
        bail!("invalid month {value:?}, expected YYYY-MM");
    }
    Ok((year, month))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();
    let args = Args::parse();

    let (start_year, start_month) = parse_month(&args.start)?;
    let (end_year, end_month) = parse_month(&args.end)?;

    let config = DataConfig::from_env();
    let client = ApiClient::new()?;
    update_trending(
        &client,
        &config,
        start_year,
        start_month,
        end_year,
        end_month,
    )
    .await
}
