pub mod analyse;
pub mod baseline;
pub mod history;
pub mod rename;

/// Directory the analyse command reads measurements from.
pub const DEFAULT_MEASUREMENT_DIR: &str = "Measurements";

/// Baseline file with the calibration constants.
pub const DEFAULT_BASELINE_FILE: &str = "bin/baseline.json";

/// History file the analysis records are appended to.
pub const DEFAULT_HISTORY_FILE: &str = "bin/history.json";

/// Directory measurements are parked in after a batch has been analysed.
pub const OLD_MEASUREMENT_DIR: &str = "_old_measurements";

/// Shorten a string for a fixed-width display column.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short.opg", 30), "short.opg");
        assert_eq!(
            truncate("a_measurement_file_name_that_runs_long_i_000.opg", 30),
            "a_measurement_file_name_tha..."
        );
        assert_eq!(truncate("áéíóú", 4), "á...");
    }
}
