//! The analyse command: run every OPG measurement in a directory against the
//! baseline, print the report, and append to the history.
//!
//! Per-file failures are reported and skipped; the batch always runs to the
//! end. Only an unusable baseline, an empty measurement directory, or a
//! history store problem stops the run with a non-zero exit.

use std::path::Path;

use kvqa_core::{
    Baseline, FileAnalysis, HistoryStore, SourceReading, ToleranceEvaluator, Verdict,
    analyze_file, list_measurement_files, now_timestamp,
};

use super::{OLD_MEASUREMENT_DIR, truncate};

pub struct AnalyseConfig<'a> {
    pub debug: bool,
    pub dir: &'a str,
    pub baseline_file: &'a str,
    pub history_file: &'a str,
    pub output_path: Option<&'a str>,
}

pub fn run(cfg: AnalyseConfig<'_>) {
    let baseline = match Baseline::load(Path::new(cfg.baseline_file)) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let mut history = match HistoryStore::load(Path::new(cfg.history_file)) {
        Ok(h) => h,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let files = match list_measurement_files(Path::new(cfg.dir), ".opg") {
        Ok(files) => files,
        Err(e) => {
            eprintln!("Error: failed to read '{}': {e}", cfg.dir);
            std::process::exit(1);
        }
    };
    if files.is_empty() {
        eprintln!(
            "No measurement files found in '{}'\n\n\
             Previously analysed measurements are kept in '{}'.\n\
             Move them back into '{}' to run the analysis on them again.",
            cfg.dir, OLD_MEASUREMENT_DIR, cfg.dir
        );
        std::process::exit(1);
    }

    print_heading(cfg.debug);

    let mut evaluator = ToleranceEvaluator::new();
    let mut analyses: Vec<FileAnalysis> = Vec::new();

    for path in &files {
        let analysis = match analyze_file(path, &baseline) {
            Ok(a) => a,
            Err(e) => {
                eprintln!("Error: {e}");
                continue;
            }
        };

        for reading in &analysis.readings {
            print_reading(&analysis, reading, cfg.debug);
            history.append(
                &now_timestamp(),
                &analysis.file_name,
                reading.source,
                &analysis.stats,
                reading.deviation,
            );
            evaluator.record(reading);
        }
        if analysis.saturated_pixels > 0 {
            println!(
                "\nWarning! {} saturated pixels in image: {}\n",
                analysis.saturated_pixels, analysis.file_name
            );
        }
        analyses.push(analysis);
    }

    let verdict = evaluator.verdict(baseline.tolerance);
    println!("\n{verdict}");
    if let Some(hint) = evaluator.guidance() {
        println!("\n{hint}");
    }

    if let Some(path) = cfg.output_path {
        write_report(path, &baseline, &analyses, &evaluator, verdict);
    }

    if let Err(e) = history.save() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn print_heading(debug: bool) {
    if debug {
        println!(
            "{:^30} {:^11} {:^11} {:^11} {:^11} {:^11} {:^11} {:>11} {:>11} {:>11} {:>11}",
            "file",
            "source",
            "BL",
            "BR",
            "TL",
            "TR",
            "CTR",
            "Dose diff",
            "whole mean",
            "left mean",
            "right mean"
        );
    } else {
        println!("{:^30}\t{:^9}\t{:^9}", "file", "source", "Dose diff");
    }
}

fn print_reading(analysis: &FileAnalysis, reading: &SourceReading, debug: bool) {
    let name = truncate(&analysis.file_name, 30);
    let s = &analysis.stats;
    if debug {
        println!(
            "{:<30} {:<11} {:>11.1} {:>11.1} {:>11.1} {:>11.1} {:>11.1} {:>11.1} {:>11.1} {:>11.1} {:>11.1}",
            name,
            reading.source,
            s.bottom_left,
            s.bottom_right,
            s.top_left,
            s.top_right,
            s.central,
            reading.deviation,
            s.whole_mean,
            s.left_mean,
            s.right_mean
        );
    } else {
        println!(
            "{:<22}\t{:<9}\t{:<9.1}",
            name, reading.source, reading.deviation
        );
    }
}

/// Write the machine-readable batch report.
fn write_report(
    path: &str,
    baseline: &Baseline,
    analyses: &[FileAnalysis],
    evaluator: &ToleranceEvaluator,
    verdict: Verdict,
) {
    let root = serde_json::json!({
        "baseline": {
            "date": &baseline.date,
            "set_by": &baseline.set_by,
            "tolerance": baseline.tolerance,
            "device_id": &baseline.device_id,
        },
        "files": analyses,
        "max_deviation": evaluator.max_deviation(),
        "max_source": evaluator.max_source().map(|s| s.to_string()),
        "verdict": verdict.to_string(),
    });

    match std::fs::write(path, serde_json::to_string_pretty(&root).unwrap()) {
        Ok(()) => println!("\nResults written to {path}"),
        Err(e) => eprintln!("\nFailed to write {path}: {e}"),
    }
}
