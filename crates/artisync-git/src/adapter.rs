//! Version-control contract and the git adapter implementing it

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::backend::{CommandBackend, GitBackend, LibraryBackend, MergeOutcome};
use crate::{Error, Result, naming};

/// Version-control operations the update engine depends on.
pub trait VersionControl {
    /// Stable cache directory name for a repository URL.
    fn mirror_name(&self, repo_url: &str) -> String {
        naming::mirror_name(repo_url)
    }

    /// Ensure `dest` holds a mirror of `repo_url` at the remote's current head.
    fn sync_mirror(&self, repo_url: &str, dest: &Path) -> Result<()>;

    /// Current revision of the mirror at `mirror_root`.
    fn head_revision(&self, mirror_root: &Path) -> Result<String>;

    /// Byte-exact content of `relative_path` at `revision`.
    ///
    /// Fails with [`Error::HistoricalContentUnavailable`] when the revision or
    /// path cannot be resolved, e.g. because shallow history dropped it.
    fn content_at_revision(
        &self,
        mirror_root: &Path,
        revision: &str,
        relative_path: &str,
    ) -> Result<Vec<u8>>;

    /// Root of the mirror containing `path`.
    fn repo_root_of(&self, path: &Path) -> Result<PathBuf>;

    /// Merge `new` into `current` in place with `base` as common ancestor.
    fn three_way_merge(&self, current: &Path, base: &Path, new: &Path) -> Result<MergeOutcome>;
}

/// Git adapter with a primary and a fallback execution backend.
///
/// Every call goes to the primary backend until one of them fails with an
/// execution failure (see [`Error::is_execution_failure`]). That call is
/// retried on the fallback, and from then on the fallback serves every call.
/// The switch is one-way for the lifetime of the adapter.
///
/// Merges run without a timeout: a hung `git` process stalls the caller.
pub struct GitAdapter {
    primary: Box<dyn GitBackend>,
    fallback: Box<dyn GitBackend>,
    fallback_engaged: AtomicBool,
}

impl Default for GitAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GitAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitAdapter")
            .field("primary", &self.primary.name())
            .field("fallback", &self.fallback.name())
            .field("fallback_engaged", &self.is_fallback_engaged())
            .finish()
    }
}

impl GitAdapter {
    /// Adapter using `git` from `PATH`, falling back to libgit2.
    pub fn new() -> Self {
        Self::with_program("git")
    }

    /// Adapter using the given git executable, falling back to libgit2.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self::with_backends(
            Box::new(CommandBackend::new(program)),
            Box::new(LibraryBackend::new()),
        )
    }

    /// Adapter with explicit backends.
    pub fn with_backends(primary: Box<dyn GitBackend>, fallback: Box<dyn GitBackend>) -> Self {
        Self {
            primary,
            fallback,
            fallback_engaged: AtomicBool::new(false),
        }
    }

    /// Whether the adapter has permanently switched to its fallback backend.
    pub fn is_fallback_engaged(&self) -> bool {
        self.fallback_engaged.load(Ordering::Acquire)
    }

    /// Name of the backend that will serve the next call.
    pub fn active_backend(&self) -> &'static str {
        if self.is_fallback_engaged() {
            self.fallback.name()
        } else {
            self.primary.name()
        }
    }

    fn dispatch<T>(
        &self,
        operation: &'static str,
        call: impl Fn(&dyn GitBackend) -> Result<T>,
    ) -> Result<T> {
        if !self.is_fallback_engaged() {
            match call(self.primary.as_ref()) {
                Err(e) if e.is_execution_failure() => {
                    tracing::warn!(
                        operation,
                        primary = self.primary.name(),
                        fallback = self.fallback.name(),
                        error = %e,
                        "Primary git backend failed to execute; switching to fallback"
                    );
                    self.fallback_engaged.store(true, Ordering::Release);
                }
                other => return other,
            }
        }
        call(self.fallback.as_ref())
    }
}

impl VersionControl for GitAdapter {
    fn sync_mirror(&self, repo_url: &str, dest: &Path) -> Result<()> {
        if dest.join(".git").exists() {
            tracing::debug!(url = %repo_url, dest = %dest.display(), "Fast-forwarding mirror");
            self.dispatch("fetch", |backend| backend.fetch_and_reset(dest))
        } else {
            tracing::debug!(url = %repo_url, dest = %dest.display(), "Cloning mirror");
            fs::create_dir_all(dest).map_err(|e| artisync_fs::Error::io(dest, e))?;
            self.dispatch("clone", |backend| backend.clone_shallow(repo_url, dest))
        }
    }

    fn head_revision(&self, mirror_root: &Path) -> Result<String> {
        self.dispatch("head_revision", |backend| backend.head_revision(mirror_root))
    }

    fn content_at_revision(
        &self,
        mirror_root: &Path,
        revision: &str,
        relative_path: &str,
    ) -> Result<Vec<u8>> {
        let git_path = relative_path.replace('\\', "/");
        self.dispatch("show", |backend| backend.show(mirror_root, revision, &git_path))
    }

    fn repo_root_of(&self, path: &Path) -> Result<PathBuf> {
        let dir = if path.is_dir() {
            path
        } else {
            match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent,
                _ => Path::new("."),
            }
        };
        if !dir.is_dir() {
            return Err(Error::NotARepository {
                path: path.to_path_buf(),
            });
        }
        self.dispatch("toplevel", |backend| backend.toplevel(dir))
    }

    fn three_way_merge(&self, current: &Path, base: &Path, new: &Path) -> Result<MergeOutcome> {
        let outcome = self.dispatch("merge", |backend| backend.merge_file(current, base, new))?;
        tracing::debug!(file = %current.display(), ?outcome, "Three-way merge finished");
        Ok(outcome)
    }
}
