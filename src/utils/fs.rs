//! Filesystem helpers with console reporting

use crate::ui;
use crate::utils::path::looks_like_path;
use std::fs;
use std::path::Path;

/// Remove a directory tree, logging the outcome
pub fn remove_dir_logged(dir: &Path) {
    if dir.is_dir() {
        ui::info(&format!("Removing directory: {}", dir.display()));
        if let Err(e) = fs::remove_dir_all(dir) {
            ui::error(&format!("Failed to remove {}: {}", dir.display(), e));
        }
    } else {
        ui::warn(&format!(
            "Directory not found while attempting to delete it: {}",
            dir.display()
        ));
    }
}

/// Whether a path-looking string points at something that exists
pub fn dir_or_file_exists(s: &str) -> bool {
    Path::new(s).exists()
}

/// Warn about variable values that look like paths but do not exist
pub fn warn_if_missing_path(value: &str) -> Option<String> {
    if looks_like_path(value) && !dir_or_file_exists(value) {
        Some(format!(
            "`{}` appears to be a file or directory, but it doesn't exist",
            value
        ))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_remove_dir_logged() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("sub");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("f.txt"), "x").unwrap();

        remove_dir_logged(&target);
        assert!(!target.exists());

        // Missing directory only warns
        remove_dir_logged(&target);
    }

    #[test]
    fn test_warn_if_missing_path() {
        assert!(warn_if_missing_path("no/such/dir/hopefully").is_some());
        assert!(warn_if_missing_path("plain-value").is_none());
    }
}
