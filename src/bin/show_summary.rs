// src/bin/show_summary.rs
use dotenv::dotenv;

use housing_stats::config::DataConfig;
use housing_stats::services::summary::show_data_summary;

/// Lists every stored snapshot with its total statistics.
fn main() {
    dotenv().ok();
    env_logger::init();

    let config = DataConfig::from_env();
    show_data_summary(&config);
}
