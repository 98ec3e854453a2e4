//! UpdateEngine implementation
//!
//! The engine installs artifacts from their mirrors and brings installed
//! copies up to date. Unmodified copies are overwritten. Modified copies are
//! three-way merged against the content they were installed from, and
//! conflicts go to the [`ConflictResolver`].
//!
//! Callers must not run two operations on the same target path at once: the
//! backup slot (`<target>.bak`) is per target.

use std::path::{Path, PathBuf};

use artisync_fs::{io, sanitize_relative};
use artisync_git::{MergeOutcome, VersionControl};
use serde::{Deserialize, Serialize};

use crate::config::default_storage_dir;
use crate::resolver::{ConflictResolver, Resolution};
use crate::scope::ScopePolicy;
use crate::session::{Backup, StagedFile};
use crate::state::{DEFAULT_KEY_NAMESPACE, StateStore, state_key};
use crate::tracking::Tracking;
use crate::{Artifact, Error, Result};

/// Result of [`UpdateEngine::update_item`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateOutcome {
    /// The target holds new content, a clean merge, or conflict markers left
    /// for manual resolution. Provenance now points at the new revision.
    Updated,
    /// The user declined a conflicted merge; nothing changed.
    Cancelled,
}

impl std::fmt::Display for UpdateOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Updated => write!(f, "updated"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Per-artifact result of [`UpdateEngine::update_all`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum BatchStatus {
    Updated,
    Cancelled,
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchEntry {
    pub artifact_id: String,
    pub target: PathBuf,
    #[serde(flatten)]
    pub status: BatchStatus,
}

impl BatchEntry {
    pub fn is_failure(&self) -> bool {
        matches!(self.status, BatchStatus::Failed { .. })
    }
}

/// Read-only view of an installed target, see [`UpdateEngine::status`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ItemStatus {
    /// No file at the target path
    NotInstalled,
    /// File exists without any provenance
    Untracked,
    /// Matches the content it was installed from
    Clean {
        base_revision: String,
        /// Whether the mirror head is still `base_revision`
        up_to_date: bool,
    },
    /// Edited since it was installed
    Modified { base_revision: String },
    /// Tracked by a legacy snapshot that the next update migrates
    LegacySnapshot { modified: bool },
    /// The recorded revision is no longer available in the mirror
    BaseUnavailable,
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotInstalled => write!(f, "not installed"),
            Self::Untracked => write!(f, "untracked"),
            Self::Clean {
                base_revision,
                up_to_date: true,
            } => write!(f, "clean at {base_revision}"),
            Self::Clean { base_revision, .. } => {
                write!(f, "clean at {base_revision}, update available")
            }
            Self::Modified { base_revision } => {
                write!(f, "locally modified since {base_revision}")
            }
            Self::LegacySnapshot { modified: true } => {
                write!(f, "locally modified (legacy snapshot)")
            }
            Self::LegacySnapshot { modified: false } => write!(f, "clean (legacy snapshot)"),
            Self::BaseUnavailable => write!(f, "base revision unavailable"),
        }
    }
}

/// Where an artifact lives in its mirror and at which revision
#[derive(Debug, Clone)]
struct SourceLocation {
    mirror_root: PathBuf,
    revision: String,
    /// `/`-separated path of the artifact relative to `mirror_root`
    relative_path: String,
}

/// Installs and updates artifacts.
///
/// Collaborators are injected: `V` reads mirrors and merges, `S` persists
/// install records, `R` decides conflicts and `P` picks the state scope of
/// each target.
pub struct UpdateEngine<V, S, R, P> {
    vcs: V,
    store: S,
    resolver: R,
    scope_policy: P,
    key_namespace: String,
    storage_dir: PathBuf,
}

impl<V, S, R, P> UpdateEngine<V, S, R, P>
where
    V: VersionControl,
    S: StateStore,
    R: ConflictResolver,
    P: ScopePolicy,
{
    pub fn new(vcs: V, store: S, resolver: R, scope_policy: P) -> Self {
        Self {
            vcs,
            store,
            resolver,
            scope_policy,
            key_namespace: DEFAULT_KEY_NAMESPACE.to_string(),
            storage_dir: default_storage_dir(),
        }
    }

    /// Use a different state key namespace.
    pub fn with_key_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.key_namespace = namespace.into();
        self
    }

    /// Root under which [`sync_source`](Self::sync_source) keeps mirrors.
    pub fn with_storage_dir(mut self, storage_dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = storage_dir.into();
        self
    }

    pub fn vcs(&self) -> &V {
        &self.vcs
    }

    /// State key of an install target.
    pub fn key_for(&self, target: &Path) -> String {
        state_key(&self.key_namespace, target)
    }

    /// Clone or fast-forward the mirror of `repo_url`.
    ///
    /// Mirrors live at `<storage_dir>/repos/<mirror name>`. Returns the
    /// mirror root.
    pub fn sync_source(&self, repo_url: &str) -> Result<PathBuf> {
        let dest = self
            .storage_dir
            .join("repos")
            .join(self.vcs.mirror_name(repo_url));
        self.vcs.sync_mirror(repo_url, &dest)?;
        tracing::info!(url = %repo_url, mirror = %dest.display(), "Mirror synced");
        Ok(dest)
    }

    /// Install `artifact` under `install_base` and record its revision.
    ///
    /// The target is `install_base/<base_directory>/<file name>` for
    /// folder-shaped artifacts and `install_base/<file name>` otherwise.
    /// `base_directory` is reduced to plain relative segments first, so it can
    /// never escape `install_base`. An existing file at the target is
    /// overwritten. Returns the absolute target path.
    pub fn install_item(&self, artifact: &Artifact, install_base: &Path) -> Result<PathBuf> {
        let source = self.resolve_source(artifact)?;
        let file_name = artifact.file_name()?;

        let mut dir = absolute(install_base)?;
        if let Some(base_directory) = artifact.base_directory.as_deref()
            && !base_directory.is_empty()
        {
            if base_directory.contains(['/', '\\']) {
                tracing::warn!(
                    artifact = %artifact.id,
                    base_directory,
                    "Base directory contains path separators; normalizing"
                );
            }
            let safe = sanitize_relative(base_directory);
            dir.extend(safe.split('/').filter(|segment| !segment.is_empty()));
        }
        let target = dir.join(file_name);

        io::copy_atomic(&artifact.install_url, &target)?;
        self.record(&target, &source.revision)?;

        tracing::info!(
            artifact = %artifact.id,
            target = %target.display(),
            revision = %source.revision,
            "Installed"
        );
        Ok(target)
    }

    /// Bring `target` up to date with the artifact's mirror.
    ///
    /// On every exit `target` holds its prior content, the new upstream
    /// content, or a conflict-marked merge; no staging or backup file
    /// survives. Only a cancelled conflict leaves provenance untouched.
    pub fn update_item(&self, artifact: &Artifact, target: &Path) -> Result<UpdateOutcome> {
        let target = &absolute(target)?;
        let source = self.resolve_source(artifact)?;
        let new_content = io::read_bytes(&artifact.install_url)?;
        let tracking = self.tracking(target)?;

        let base = if target.is_file() {
            self.base_content(&tracking, &source)
        } else {
            None
        };

        let outcome = match base {
            None => {
                tracing::debug!(target = %target.display(), "No local baseline; overwriting");
                io::write_atomic(target, &new_content)?;
                UpdateOutcome::Updated
            }
            Some(base) => {
                let current = io::read_bytes(target)?;
                let base = base.unwrap_or_else(|e| {
                    // Treats the local copy as unmodified, so local edits are
                    // overwritten below
                    tracing::warn!(
                        target = %target.display(),
                        error = %e,
                        "Base content unavailable; assuming local copy is unmodified"
                    );
                    current.clone()
                });

                if current == base {
                    io::write_atomic(target, &new_content)?;
                    UpdateOutcome::Updated
                } else {
                    self.merge_local_changes(artifact, target, &base, &new_content)?
                }
            }
        };

        if outcome == UpdateOutcome::Cancelled {
            tracing::info!(artifact = %artifact.id, target = %target.display(), "Update cancelled");
            return Ok(outcome);
        }

        self.record(target, &source.revision)?;

        if let Some(snapshot) = tracking.snapshot() {
            io::remove_quietly(&snapshot.path);
            tracing::info!(
                target = %target.display(),
                snapshot = %snapshot.path.display(),
                "Migrated legacy snapshot to revision tracking"
            );
        }

        tracing::info!(
            artifact = %artifact.id,
            target = %target.display(),
            revision = %source.revision,
            "Updated"
        );
        Ok(outcome)
    }

    /// Update every `(artifact, target)` pair in order.
    ///
    /// A failing artifact is reported in its entry and does not stop the
    /// batch.
    pub fn update_all<'a, I>(&self, batch: I) -> Vec<BatchEntry>
    where
        I: IntoIterator<Item = (&'a Artifact, &'a Path)>,
    {
        batch
            .into_iter()
            .map(|(artifact, target)| {
                let status = match self.update_item(artifact, target) {
                    Ok(UpdateOutcome::Updated) => BatchStatus::Updated,
                    Ok(UpdateOutcome::Cancelled) => BatchStatus::Cancelled,
                    Err(e) => {
                        tracing::error!(artifact = %artifact.id, error = %e, "Update failed");
                        BatchStatus::Failed {
                            error: e.to_string(),
                        }
                    }
                };
                BatchEntry {
                    artifact_id: artifact.id.clone(),
                    target: target.to_path_buf(),
                    status,
                }
            })
            .collect()
    }

    /// Inspect `target` without modifying anything.
    pub fn status(&self, artifact: &Artifact, target: &Path) -> Result<ItemStatus> {
        let target = &absolute(target)?;
        if !target.is_file() {
            return Ok(ItemStatus::NotInstalled);
        }

        let source = self.resolve_source(artifact)?;
        let tracking = self.tracking(target)?;
        let Some(base) = self.base_content(&tracking, &source) else {
            return Ok(ItemStatus::Untracked);
        };
        let base = match base {
            Ok(base) => base,
            Err(e) => {
                tracing::debug!(target = %target.display(), error = %e, "Base content unavailable");
                return Ok(ItemStatus::BaseUnavailable);
            }
        };
        let modified = io::read_bytes(target)? != base;

        Ok(match tracking {
            Tracking::Untracked => ItemStatus::Untracked,
            Tracking::NeedsMigration { .. } => ItemStatus::LegacySnapshot { modified },
            Tracking::Migrated { base_revision } if modified => {
                ItemStatus::Modified { base_revision }
            }
            Tracking::Migrated { base_revision } => ItemStatus::Clean {
                up_to_date: base_revision == source.revision,
                base_revision,
            },
        })
    }

    /// Merge upstream changes into a locally modified target.
    fn merge_local_changes(
        &self,
        artifact: &Artifact,
        target: &Path,
        base: &[u8],
        new_content: &[u8],
    ) -> Result<UpdateOutcome> {
        // Restores the target if anything below fails
        let backup = Backup::take(target)?;

        let outcome = {
            let base_file = StagedFile::create("base", target, base)?;
            let new_file = StagedFile::create("new", target, new_content)?;
            self.vcs
                .three_way_merge(target, base_file.path(), new_file.path())?
        };

        if outcome == MergeOutcome::Conflicted {
            match self.resolver.resolve(artifact, target)? {
                Resolution::Override => {
                    tracing::debug!(target = %target.display(), "Conflict: taking upstream");
                    io::write_atomic(target, new_content)?;
                }
                Resolution::Cancel => {
                    backup.restore()?;
                    return Ok(UpdateOutcome::Cancelled);
                }
                Resolution::Manual => {
                    tracing::info!(
                        target = %target.display(),
                        "Conflict markers left for manual resolution"
                    );
                }
            }
        }

        backup.discard();
        Ok(UpdateOutcome::Updated)
    }

    /// Base to diff the local copy against, or `None` when untracked.
    ///
    /// A recorded revision wins over a legacy snapshot.
    fn base_content(
        &self,
        tracking: &Tracking,
        source: &SourceLocation,
    ) -> Option<artisync_git::Result<Vec<u8>>> {
        if let Some(revision) = tracking.base_revision() {
            return Some(self.vcs.content_at_revision(
                &source.mirror_root,
                revision,
                &source.relative_path,
            ));
        }
        tracking.snapshot().map(|snapshot| Ok(snapshot.content.clone()))
    }

    /// `target` must already be absolute so scope and key agree.
    fn tracking(&self, target: &Path) -> Result<Tracking> {
        let scope = self.scope_policy.scope_for(target);
        Tracking::resolve(&self.store, &self.key_for(target), scope, target)
    }

    fn record(&self, target: &Path, revision: &str) -> Result<()> {
        let scope = self.scope_policy.scope_for(target);
        self.store.update(&self.key_for(target), revision, scope)
    }

    fn resolve_source(&self, artifact: &Artifact) -> Result<SourceLocation> {
        self.locate(&artifact.install_url)
            .map_err(|source| Error::SourceResolution {
                artifact: artifact.id.clone(),
                source,
            })
    }

    fn locate(&self, install_url: &Path) -> artisync_git::Result<SourceLocation> {
        let mirror_root = self.vcs.repo_root_of(install_url)?;
        let revision = self.vcs.head_revision(&mirror_root)?;

        // git reports the resolved root; resolve the file the same way
        let canonical_root = dunce::canonicalize(&mirror_root)
            .map_err(|e| artisync_fs::Error::io(&mirror_root, e))?;
        let canonical_file = dunce::canonicalize(install_url)
            .map_err(|e| artisync_fs::Error::io(install_url, e))?;
        let relative = canonical_file
            .strip_prefix(&canonical_root)
            .map_err(|_| artisync_git::Error::NotARepository {
                path: install_url.to_path_buf(),
            })?;

        Ok(SourceLocation {
            mirror_root,
            revision,
            relative_path: relative.to_string_lossy().replace('\\', "/"),
        })
    }
}

/// Absolute spelling of an install target, the same one [`state_key`] uses.
fn absolute(target: &Path) -> Result<PathBuf> {
    std::path::absolute(target).map_err(|e| artisync_fs::Error::io(target, e).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn batch_entry_serializes_flat() {
        let entry = BatchEntry {
            artifact_id: "r:a.agent.md".into(),
            target: PathBuf::from("/w/a.agent.md"),
            status: BatchStatus::Failed {
                error: "boom".into(),
            },
        };

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["error"], "boom");
        assert!(entry.is_failure());
    }

    #[test]
    fn status_display_mentions_revision() {
        let status = ItemStatus::Clean {
            base_revision: "abc123".into(),
            up_to_date: false,
        };
        assert_eq!(status.to_string(), "clean at abc123, update available");
    }

    #[test]
    fn outcome_display() {
        assert_eq!(UpdateOutcome::Updated.to_string(), "updated");
        assert_eq!(UpdateOutcome::Cancelled.to_string(), "cancelled");
    }
}
