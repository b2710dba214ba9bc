//! `kvqa history` — print the measurement history one record per line.

use std::path::Path;

use kvqa_core::HistoryStore;

pub fn run(file: &str) {
    let path = Path::new(file);
    if !path.exists() {
        eprintln!("No history file at {file}");
        eprintln!("Run an analysis first: kvqa analyse");
        std::process::exit(1);
    }

    let store = match HistoryStore::load(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    for record in store.records() {
        println!("{record}");
    }
    println!("\n{} record(s) in {file}", store.len().saturating_sub(1));
}
