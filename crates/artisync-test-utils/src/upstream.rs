//! [`UpstreamRepo`] builder for source repository scenarios.
//!
//! Realism level: **REAL WITH HISTORY**. Every commit is made through
//! `git2`, so no `git` executable is required.

use std::fs;
use std::path::{Path, PathBuf};

use git2::{Repository, Signature};
use tempfile::TempDir;

/// A temporary git working tree standing in for a published artifact source.
///
/// # Example
///
/// ```rust,no_run
/// use artisync_test_utils::UpstreamRepo;
///
/// let upstream = UpstreamRepo::new();
/// let r1 = upstream.commit_file("agents/reviewer.agent.md", "X\n");
/// let r2 = upstream.commit_file("agents/reviewer.agent.md", "Y\n");
/// assert_ne!(r1, r2);
/// ```
pub struct UpstreamRepo {
    temp_dir: TempDir,
    repo: Repository,
}

impl Default for UpstreamRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl UpstreamRepo {
    /// Initialise an empty repository in a fresh temporary directory.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("UpstreamRepo::new: failed to create temp dir");
        let repo = Repository::init(temp_dir.path()).unwrap_or_else(|e| {
            panic!(
                "UpstreamRepo::new: failed to init repository at {}: {e}",
                temp_dir.path().display()
            )
        });
        Self { temp_dir, repo }
    }

    /// Root of the working tree.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of `relative` inside the working tree.
    pub fn path_of(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    /// Write `content` to `relative`, commit it, and return the new revision.
    ///
    /// # Panics
    /// Panics if any filesystem or git operation fails.
    pub fn commit_file(&self, relative: &str, content: &str) -> String {
        let full_path = self.path_of(relative);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full_path, content)
            .unwrap_or_else(|e| panic!("commit_file: failed to write {relative}: {e}"));

        let mut index = self.repo.index().unwrap();
        index.add_path(Path::new(relative)).unwrap();
        index.write().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = self.repo.find_tree(tree_id).unwrap();

        let sig = Signature::now("Test User", "test@test.com").unwrap();
        let parent = self
            .repo
            .head()
            .ok()
            .and_then(|head| head.peel_to_commit().ok());
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        let oid = self
            .repo
            .commit(
                Some("HEAD"),
                &sig,
                &sig,
                &format!("Update {relative}"),
                &tree,
                &parents,
            )
            .unwrap_or_else(|e| panic!("commit_file: commit failed: {e}"));
        oid.to_string()
    }

    /// Current HEAD revision.
    pub fn head(&self) -> String {
        self.repo
            .head()
            .and_then(|head| head.peel_to_commit())
            .map(|commit| commit.id().to_string())
            .expect("UpstreamRepo::head: repository has no commits")
    }
}
