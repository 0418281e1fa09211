//! Configuration fixtures.

use std::path::{Path, PathBuf};

/// Hub config preserving `log` and `progress` with a small history cap.
pub const SAMPLE_HUB_TOML: &str = r#"
preserve = ["log", "progress"]
preserve_limit = 3
"#;

/// Write `contents` to `hub.toml` inside `dir` and return the path.
///
/// # Panics
///
/// Panics if the file cannot be written.
#[must_use]
pub fn write_config_file(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("hub.toml");
    std::fs::write(&path, contents).expect("failed to write config fixture");
    path
}

/// Create a temporary directory holding [`SAMPLE_HUB_TOML`].
///
/// Keep the returned guard alive for as long as the file is needed.
///
/// # Panics
///
/// Panics if the directory or file cannot be created.
#[must_use]
pub fn sample_config_dir() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("failed to create tempdir");
    let path = write_config_file(dir.path(), SAMPLE_HUB_TOML);
    (dir, path)
}
