// src/bin/process_existing.rs
use clap::Parser;
use dotenv::dotenv;

use housing_stats::config::DataConfig;
use housing_stats::services::postprocess::process_existing;

/// Re-derives total statistics for already-stored snapshot files.
#[derive(Parser)]
struct Args {
    /// Recompute totals even for files that already carry them.
    #[arg(long)]
    force: bool,
}

fn main() {
    dotenv().ok();
    env_logger::init();
    let args = Args::parse();

    if args.force {
        println!("Force-updating existing data files (recomputing totals)...");
    } else {
        println!("Processing existing data files (use --force to overwrite existing totals)...");
    }

    let config = DataConfig::from_env();
    let report = process_existing(&config, args.force);

    println!("Processing completed:");
    println!("  processed: {} file(s)", report.processed);
    println!("  skipped:   {} file(s)", report.skipped);
}
