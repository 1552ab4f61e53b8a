// src/bin/build_ui_data.rs
use anyhow::Result;
use dotenv::dotenv;

use housing_stats::config::DataConfig;
use housing_stats::services::matrix::write_ui_data;

/// Regenerates the JSON feeds consumed by the chart front end.
fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = DataConfig::from_env();
    write_ui_data(&config)
}
