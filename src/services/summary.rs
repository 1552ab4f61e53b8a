// src/services/summary.rs
use crate::config::DataConfig;
use crate::models::Category;
use crate::services::store::{collect_json_files, load_snapshot};

/// Prints one line per stored snapshot with its totals, flagging files whose
/// totals are missing and files that cannot be read. Purely informational;
/// never fails.
pub fn show_data_summary(config: &DataConfig) {
    println!("Snapshot totals summary");
    println!("{}", "=".repeat(72));

    for category in Category::ALL {
        let dir = config.category_dir(category);
        println!("\n{}:", category);

        if !dir.is_dir() {
            println!("  (directory does not exist)");
            continue;
        }

        let mut files = collect_json_files(&dir);
        files.sort();
        if files.is_empty() {
            println!("  (no data files)");
            continue;
        }

        for path in files {
            let name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("?")
                .to_string();
            match load_snapshot(&path) {
                Ok(snapshot) => match snapshot.data {
                    Some(data) if data.has_totals() => println!(
                        "  {}: total area {:.2} m2, {} transaction(s)",
                        name,
                        data.data_total_mj.unwrap_or(0.0),
                        data.data_total_ts.unwrap_or(0),
                    ),
                    _ => println!("  {}: missing total statistics", name),
                },
                Err(e) => println!("  {}: unreadable ({})", name, e),
            }
        }
    }

    println!("\n{}", "=".repeat(72));
}
