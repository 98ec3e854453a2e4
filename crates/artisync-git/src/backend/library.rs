//! Backend built on the embedded libgit2 library

use std::path::{Path, PathBuf};

use git2::build::RepoBuilder;
use git2::{
    FetchOptions, IndexEntry, IndexTime, MergeFileOptions, Oid, Repository, ResetType,
};
use tempfile::TempDir;

use super::{GitBackend, MERGE_LABELS, MergeOutcome};
use crate::{Error, Result};

const ORIGIN: &str = "origin";

/// Runs git primitives in-process through `git2`.
///
/// Needs no external tooling, which makes it the fallback for hosts where
/// the `git` program is missing or unusable.
#[derive(Debug, Clone, Copy, Default)]
pub struct LibraryBackend;

impl LibraryBackend {
    pub fn new() -> Self {
        Self
    }
}

fn shallow_fetch_options<'cb>() -> FetchOptions<'cb> {
    let mut opts = FetchOptions::new();
    opts.depth(1);
    opts
}

/// Index entry describing an in-memory blob, as `merge_file_from_index` expects.
fn blob_entry(id: Oid, size: usize, path: &Path) -> IndexEntry {
    IndexEntry {
        ctime: IndexTime::new(0, 0),
        mtime: IndexTime::new(0, 0),
        dev: 0,
        ino: 0,
        mode: 0o100644,
        uid: 0,
        gid: 0,
        file_size: u32::try_from(size).unwrap_or(u32::MAX),
        id,
        flags: 0,
        flags_extended: 0,
        path: path.to_string_lossy().replace('\\', "/").into_bytes(),
    }
}

impl GitBackend for LibraryBackend {
    fn name(&self) -> &'static str {
        "libgit2"
    }

    fn clone_shallow(&self, url: &str, dest: &Path) -> Result<()> {
        RepoBuilder::new()
            .fetch_options(shallow_fetch_options())
            .clone(url, dest)?;
        Ok(())
    }

    fn fetch_and_reset(&self, mirror: &Path) -> Result<()> {
        let repo = Repository::open(mirror)?;
        let mut remote = repo.find_remote(ORIGIN)?;
        let url = remote.url().unwrap_or_default().to_string();

        let mut opts = shallow_fetch_options();
        remote.fetch(&[] as &[&str], Some(&mut opts), None)?;

        let target = repo
            .revparse_single("refs/remotes/origin/HEAD")
            .or_else(|_| repo.revparse_single("FETCH_HEAD"))
            .map_err(|e| Error::MirrorSyncFailed {
                url,
                message: format!("Could not resolve remote HEAD: {}", e.message()),
            })?;
        let commit = target.peel_to_commit()?;

        repo.reset(commit.as_object(), ResetType::Hard, None)?;
        Ok(())
    }

    fn head_revision(&self, mirror: &Path) -> Result<String> {
        let repo = Repository::open(mirror)?;
        let commit = repo.head()?.peel_to_commit()?;
        Ok(commit.id().to_string())
    }

    fn show(&self, mirror: &Path, revision: &str, relative_path: &str) -> Result<Vec<u8>> {
        let unavailable = |e: git2::Error| Error::HistoricalContentUnavailable {
            revision: revision.to_string(),
            path: relative_path.to_string(),
            reason: e.message().to_string(),
        };

        let repo = Repository::open(mirror)?;
        let commit = repo
            .revparse_single(revision)
            .and_then(|object| object.peel_to_commit())
            .map_err(unavailable)?;
        let entry = commit
            .tree()
            .and_then(|tree| tree.get_path(Path::new(relative_path)))
            .map_err(unavailable)?;
        let blob = entry
            .to_object(&repo)
            .and_then(|object| object.peel_to_blob())
            .map_err(unavailable)?;

        Ok(blob.content().to_vec())
    }

    fn toplevel(&self, dir: &Path) -> Result<PathBuf> {
        let not_a_repo = || Error::NotARepository {
            path: dir.to_path_buf(),
        };
        let repo = Repository::discover(dir).map_err(|_| not_a_repo())?;
        repo.workdir()
            .map(|p| p.to_path_buf())
            .ok_or_else(not_a_repo)
    }

    fn merge_file(&self, current: &Path, base: &Path, new: &Path) -> Result<MergeOutcome> {
        let ours = artisync_fs::io::read_bytes(current)?;
        let ancestor = artisync_fs::io::read_bytes(base)?;
        let theirs = artisync_fs::io::read_bytes(new)?;

        // Scratch object store; the merge only needs the three blobs
        let scratch = TempDir::new().map_err(|e| artisync_fs::Error::io(std::env::temp_dir(), e))?;
        let repo = Repository::init_bare(scratch.path())?;

        let ancestor_entry = blob_entry(repo.blob(&ancestor)?, ancestor.len(), base);
        let ours_entry = blob_entry(repo.blob(&ours)?, ours.len(), current);
        let theirs_entry = blob_entry(repo.blob(&theirs)?, theirs.len(), new);

        let [our_label, ancestor_label, their_label] = MERGE_LABELS;
        let mut opts = MergeFileOptions::new();
        opts.ancestor_label(ancestor_label)
            .our_label(our_label)
            .their_label(their_label);

        let result =
            repo.merge_file_from_index(&ancestor_entry, &ours_entry, &theirs_entry, Some(&mut opts))?;

        artisync_fs::io::write_atomic(current, result.content())?;

        if result.is_automergeable() {
            Ok(MergeOutcome::Clean)
        } else {
            Ok(MergeOutcome::Conflicted)
        }
    }
}
