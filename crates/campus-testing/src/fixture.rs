//! Fixture file lookup.
//!
//! Fixtures live under `fixtures/` at the workspace root, e.g.
//! `fixtures/legacy/users.json`.

use std::path::{Path, PathBuf};

/// Fixture lookup rooted at the nearest ancestor that has a `fixtures/` dir.
///
/// # Example
/// ```no_run
/// use campus_testing::fixture::Fixture;
/// Fixture::copy_to("legacy/users.json", std::path::Path::new("/tmp/data/users.json"));
/// ```
pub struct Fixture;

impl Fixture {
    /// Absolute path of `fixtures/<relative_path>`.
    ///
    /// Panics if no `fixtures/` directory is found above the crate.
    pub fn path(relative_path: &str) -> PathBuf {
        let start = std::env::var("CARGO_MANIFEST_DIR")
            .map(PathBuf::from)
            .or_else(|_| std::env::current_dir())
            .expect("a starting directory");
        let root = start
            .ancestors()
            .find(|a| a.join("fixtures").is_dir())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| panic!("no fixtures/ directory above {}", start.display()));
        root.join("fixtures").join(relative_path)
    }

    /// Copy `fixtures/<relative_path>` to `dest`, creating parent directories.
    pub fn copy_to(relative_path: &str, dest: &Path) {
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)
                .unwrap_or_else(|e| panic!("create {}: {}", parent.display(), e));
        }
        let src = Self::path(relative_path);
        std::fs::copy(&src, dest)
            .unwrap_or_else(|e| panic!("copy {} to {}: {}", src.display(), dest.display(), e));
    }
}
