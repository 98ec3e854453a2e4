//! Execution backends for git operations

mod command;
mod library;

pub use command::CommandBackend;
pub use library::LibraryBackend;

use std::path::{Path, PathBuf};

use crate::Result;

/// Labels written into conflict markers, in `current`, `base`, `new` order.
pub(crate) const MERGE_LABELS: [&str; 3] = ["current", "base", "new"];

/// Result of a three-way file merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Both sides merged without overlap
    Clean,
    /// Overlapping changes were written as inline conflict markers
    Conflicted,
}

/// One way of executing git primitives.
///
/// Implementations report a conflict as [`MergeOutcome::Conflicted`], never as
/// an error. Errors for which [`Error::is_execution_failure`] is true signal
/// that the backend itself is unusable in this environment.
///
/// [`Error::is_execution_failure`]: crate::Error::is_execution_failure
pub trait GitBackend: Send + Sync {
    /// Short name used in log output
    fn name(&self) -> &'static str;

    /// Depth-1, single-branch clone of `url` into `dest`
    fn clone_shallow(&self, url: &str, dest: &Path) -> Result<()>;

    /// Depth-1 fetch of `origin` followed by a hard reset to its HEAD
    fn fetch_and_reset(&self, mirror: &Path) -> Result<()>;

    /// Full revision id of HEAD
    fn head_revision(&self, mirror: &Path) -> Result<String>;

    /// Raw bytes of `relative_path` (forward slashes) at `revision`
    fn show(&self, mirror: &Path, revision: &str, relative_path: &str) -> Result<Vec<u8>>;

    /// Root of the working tree containing `dir`
    fn toplevel(&self, dir: &Path) -> Result<PathBuf>;

    /// Merge `new` into `current` in place using `base` as ancestor
    fn merge_file(&self, current: &Path, base: &Path, new: &Path) -> Result<MergeOutcome>;
}
