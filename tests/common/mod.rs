//! Common test utilities

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a temporary directory with a utask.yml file
pub fn create_test_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("utask.yml");
    fs::write(&config_path, content).unwrap();
    (temp_dir, config_path)
}
