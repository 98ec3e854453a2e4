//! Helpers for tests that need the external `git` program.

use std::path::Path;
use std::process::Command;

/// Returns `true` when a `git` executable can be spawned.
///
/// Tests that exercise the command-line backend directly call this first and
/// return early when git is not installed.
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// A `file://` URL for a local repository.
///
/// Shallow clones are honoured for `file://` URLs but ignored for plain
/// paths, so mirror tests should always go through this.
pub fn file_url(path: &Path) -> String {
    let normalized = path.to_string_lossy().replace('\\', "/");
    if normalized.starts_with('/') {
        format!("file://{normalized}")
    } else {
        format!("file:///{normalized}")
    }
}
