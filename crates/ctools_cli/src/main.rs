//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `ctools_core` linkage.
//! - Optionally open a check-in database and print today's items.
//!
//! Usage: `ctools_cli [DB_PATH]`

use ctools_core::{builtin_tools, CheckInStore, SqlitePreferenceStore};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("ctools_core ping={}", ctools_core::ping());
    println!("ctools_core version={}", ctools_core::core_version());
    for tool in builtin_tools() {
        println!("tool id={} name={}", tool.id, tool.name);
    }

    let Some(db_path) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };
    match print_items(&db_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn print_items(db_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let prefs = SqlitePreferenceStore::open(db_path)?;
    let mut store = CheckInStore::new(prefs);
    let report = store.initialize()?;
    println!(
        "checkin items={} records={} seeded={} reconciled={}",
        report.item_count, report.record_count, report.seeded_defaults, report.reconciled_items
    );
    for item in store.items().iter() {
        println!("  [{}] {} {}", item.order, item.name, item.count_label());
    }
    Ok(())
}
