//! `kvqa baseline` — show the stored calibration baseline or write a new one.

use std::path::Path;

use kvqa_core::Baseline;

/// Print the baseline stored in `file`.
pub fn show(file: &str) {
    let baseline = match Baseline::load(Path::new(file)) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    println!("Baseline: {file}");
    print_fields(&baseline);
}

/// Validate and write a new baseline, rotating any existing file into the
/// `previous_`-prefixed backup slot first.
pub fn set(baseline: Baseline, file: &str) {
    match baseline.store(Path::new(file)) {
        Ok(backup) => {
            if let Some(prev) = backup {
                println!("Previous baseline kept as {}", prev.display());
            }
            println!("New baseline written to {file}");
            print_fields(&baseline);
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn print_fields(b: &Baseline) {
    println!("  Date:                   {}", b.date);
    println!("  Set by:                 {}", b.set_by);
    println!("  Orthogonal reference:   {}", b.orthogonal_ref);
    println!("  Left obl., left band:   {}", b.left_in_left);
    println!("  Left obl., right band:  {}", b.left_in_right);
    println!("  Right obl., left band:  {}", b.right_in_left);
    println!("  Right obl., right band: {}", b.right_in_right);
    println!("  Left band columns:      {}-{}", b.left_start, b.left_end);
    println!("  Right band columns:     {}-{}", b.right_start, b.right_end);
    println!("  Tolerance:              {}%", b.tolerance);
    if let Some(id) = &b.device_id {
        println!("  Device:                 {id}");
    }
}
