//! Engine wiring for CLI commands
//!
//! Turns [`Settings`] into an [`UpdateEngine`] backed by the on-disk state
//! store, and turns a file inside a mirror into an [`Artifact`].

use std::path::{Path, PathBuf};

use artisync_core::{
    Artifact, ConflictResolver, FileStateStore, GlobalRoots, Settings, UpdateEngine,
};
use artisync_git::{GitAdapter, VersionControl};

use crate::error::{CliError, Result};

pub type Engine = UpdateEngine<GitAdapter, FileStateStore, Box<dyn ConflictResolver>, GlobalRoots>;

/// Build the engine for the current working directory.
pub fn engine(settings: &Settings, resolver: Box<dyn ConflictResolver>) -> Result<Engine> {
    let cwd = std::env::current_dir()?;
    tracing::debug!(
        storage = %settings.storage_dir.display(),
        workspace_state = %settings.workspace_state_dir(&cwd).display(),
        "Using state directories"
    );

    Ok(UpdateEngine::new(
        GitAdapter::with_program(settings.git_program.clone()),
        settings.state_store(&cwd),
        resolver,
        settings.scope_policy(),
    )
    .with_key_namespace(settings.key_namespace.clone())
    .with_storage_dir(settings.storage_dir.clone()))
}

/// Describe the artifact at `source`, a file inside a mirror checkout.
pub fn artifact_from_source(vcs: &impl VersionControl, source: &Path) -> Result<Artifact> {
    if !source.is_file() {
        return Err(CliError::user(format!(
            "Source file not found: {}",
            source.display()
        )));
    }
    let source = dunce::canonicalize(source)?;
    let root = dunce::canonicalize(vcs.repo_root_of(&source)?)?;
    let repository = origin_url(&root).unwrap_or_else(|| root.display().to_string());

    Ok(Artifact::from_mirror_file(&repository, &root, &source)?)
}

/// URL of the mirror's `origin` remote, if it has one.
fn origin_url(root: &Path) -> Option<String> {
    let repo = git2::Repository::open(root).ok()?;
    let remote = repo.find_remote("origin").ok()?;
    remote.url().map(str::to_string)
}

/// Resolve the settings file from `--config` or the default location.
pub fn settings(config: Option<&PathBuf>) -> Result<Settings> {
    Ok(Settings::discover(config.map(PathBuf::as_path))?)
}
