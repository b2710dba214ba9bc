//! `kvqa rename` — number the files of a measurement batch.
//!
//! Renames every file in a directory matching the given extension to
//! `<n>_<stem><ext>` with a 1-based running counter. Files are taken in
//! sorted name order so the numbering is deterministic. An existing file
//! already occupying a target name is never overwritten.

use std::fs;
use std::path::{Path, PathBuf};

pub fn run(extension: &str, stem: &str, dir: &str) {
    let ext = if extension.starts_with('.') {
        extension.to_string()
    } else {
        format!(".{extension}")
    };

    let dir_path = Path::new(dir);
    let entries = match fs::read_dir(dir_path) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Error: failed to read '{dir}': {e}");
            std::process::exit(1);
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.file_name()
                    .map(|n| n.to_string_lossy().ends_with(&ext))
                    .unwrap_or(false)
        })
        .collect();
    files.sort();

    if files.is_empty() {
        println!("No files found with extension {ext} in {dir}");
        return;
    }

    let mut renamed = 0usize;
    for (i, path) in files.iter().enumerate() {
        let target = dir_path.join(format!("{}_{stem}{ext}", i + 1));
        if *path == target {
            continue;
        }
        if target.exists() {
            eprintln!(
                "Skipping {}: {} already exists",
                path.display(),
                target.display()
            );
            continue;
        }
        match fs::rename(path, &target) {
            Ok(()) => renamed += 1,
            Err(e) => eprintln!("Failed to rename {}: {e}", path.display()),
        }
    }

    println!("Renamed {renamed} of {} file(s) in {dir}", files.len());
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renames_in_sorted_order() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["c.opg", "a.opg", "b.opg"] {
            fs::write(dir.path().join(name), name).unwrap();
        }

        run(".opg", "meas", dir.path().to_str().unwrap());

        assert_eq!(
            fs::read_to_string(dir.path().join("1_meas.opg")).unwrap(),
            "a.opg"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("2_meas.opg")).unwrap(),
            "b.opg"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("3_meas.opg")).unwrap(),
            "c.opg"
        );
        assert!(!dir.path().join("a.opg").exists());
    }

    #[test]
    fn test_extension_without_leading_dot() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("x.opg"), "x").unwrap();

        run("opg", "meas", dir.path().to_str().unwrap());

        assert!(dir.path().join("1_meas.opg").exists());
    }

    #[test]
    fn test_skips_other_extensions() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("keep.txt"), "t").unwrap();
        fs::write(dir.path().join("x.opg"), "x").unwrap();

        run(".opg", "meas", dir.path().to_str().unwrap());

        assert!(dir.path().join("keep.txt").exists());
        assert!(dir.path().join("1_meas.opg").exists());
    }

    #[test]
    fn test_never_overwrites_existing_target() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("0_meas.opg"), "zero").unwrap();
        fs::write(dir.path().join("1_meas.opg"), "one").unwrap();

        run(".opg", "meas", dir.path().to_str().unwrap());

        // "0_meas.opg" wanted the name "1_meas.opg", which was still taken
        // at that point, so it stays put; the old "1_meas.opg" itself moves
        // on to slot 2. Both contents survive.
        assert_eq!(
            fs::read_to_string(dir.path().join("0_meas.opg")).unwrap(),
            "zero"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("2_meas.opg")).unwrap(),
            "one"
        );
        assert!(!dir.path().join("1_meas.opg").exists());
    }

    #[test]
    fn test_empty_directory_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        // No panic, no files created.
        run(".opg", "meas", dir.path().to_str().unwrap());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
