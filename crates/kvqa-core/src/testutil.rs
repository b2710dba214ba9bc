//! Shared test fixtures: synthetic grids, OPG file builders, a known
//! baseline.

use std::fs;
use std::path::{Path, PathBuf};

use crate::baseline::Baseline;
use crate::grid::{GRID_SIZE, PixelGrid};

/// Baseline used across the test suites.
pub fn test_baseline() -> Baseline {
    Baseline {
        date: "15/02/2022".to_string(),
        set_by: "JL".to_string(),
        orthogonal_ref: 142.0,
        left_in_left: 53.0,
        left_in_right: 12.0,
        right_in_left: 1.0,
        right_in_right: 262.0,
        left_start: 1,
        left_end: 80,
        right_start: 500,
        right_end: 600,
        tolerance: 3.0,
        device_id: Some("18066528".to_string()),
    }
}

/// Grid with uniform values in each 100x100 corner block (physical reading
/// order: top-left, top-right, bottom-left, bottom-right), zero elsewhere.
pub fn corner_grid(tl: f64, tr: f64, bl: f64, br: f64) -> PixelGrid {
    PixelGrid::from_fn(|r, c| {
        let top = r < 100;
        let bottom = r >= GRID_SIZE - 100;
        let left = c < 100;
        let right = c >= GRID_SIZE - 100;
        if top && left {
            tl
        } else if top && right {
            tr
        } else if bottom && left {
            bl
        } else if bottom && right {
            br
        } else {
            0.0
        }
    })
}

/// Render a grid as OPG file text: header block, `<asciibody>` marker on
/// line 27, four pre-data lines, then one labelled row per grid row.
pub fn opg_text(grid: &PixelGrid) -> String {
    let mut lines: Vec<String> = Vec::with_capacity(GRID_SIZE + 31);
    lines.push("<opimrtascii>".to_string());
    lines.push("<asciiheader>".to_string());
    for i in 2..25 {
        lines.push(format!("Header Field {i}: value"));
    }
    lines.push("</asciiheader>".to_string());
    lines.push("<asciibody>".to_string());
    lines.push("Plane Position: 0 mm".to_string());
    lines.push("Data Factor: 1.0".to_string());
    lines.push("Data Unit: counts".to_string());
    lines.push("X[mm]".to_string());
    for row in 0..GRID_SIZE {
        let mut line = format!("Y{row}");
        for col in 0..GRID_SIZE {
            line.push(' ');
            line.push_str(&grid.value(row, col).to_string());
        }
        lines.push(line);
    }
    lines.join("\n")
}

/// Write `grid` as an OPG file under `dir` and return its path.
pub fn write_opg(dir: &Path, name: &str, grid: &PixelGrid) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, opg_text(grid)).unwrap();
    path
}
