//! Install provenance
//!
//! Two generations of provenance coexist on disk. Current installs have a
//! revision record in the state store. Older installs left a full content
//! snapshot next to the target (`.<file name>.base`). [`Tracking`] is the
//! single view of both, resolved once per operation.

use std::path::{Path, PathBuf};

use crate::state::{Scope, StateStore};
use crate::{Error, Result};

/// A legacy content snapshot found next to an install target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacySnapshot {
    pub path: PathBuf,
    pub content: Vec<u8>,
}

impl LegacySnapshot {
    /// Snapshot location for `target`: `.<file name>.base` in the same directory.
    pub fn path_for(target: &Path) -> Result<PathBuf> {
        let name = target.file_name().ok_or_else(|| Error::InvalidArtifact {
            message: format!("install target {} has no file name", target.display()),
        })?;
        let mut snapshot_name = std::ffi::OsString::from(".");
        snapshot_name.push(name);
        snapshot_name.push(".base");
        Ok(target.with_file_name(snapshot_name))
    }

    /// Load the snapshot for `target`, if one exists.
    pub fn find(target: &Path) -> Result<Option<Self>> {
        let path = Self::path_for(target)?;
        if !path.is_file() {
            return Ok(None);
        }
        let content = artisync_fs::io::read_bytes(&path)?;
        Ok(Some(Self { path, content }))
    }
}

/// Provenance of an install target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tracking {
    /// Neither a revision record nor a snapshot
    Untracked,
    /// Revision record only
    Migrated { base_revision: String },
    /// A legacy snapshot exists, possibly alongside a record. The snapshot is
    /// removed by the next successful update.
    NeedsMigration {
        base_revision: Option<String>,
        snapshot: LegacySnapshot,
    },
}

impl Tracking {
    /// Look up the record for `key` in `scope` and the snapshot next to `target`.
    pub fn resolve<S: StateStore + ?Sized>(
        store: &S,
        key: &str,
        scope: Scope,
        target: &Path,
    ) -> Result<Self> {
        let base_revision = store.get(key, scope)?.filter(|r| !r.is_empty());
        let snapshot = LegacySnapshot::find(target)?;

        Ok(match (base_revision, snapshot) {
            (base_revision, Some(snapshot)) => Self::NeedsMigration {
                base_revision,
                snapshot,
            },
            (Some(base_revision), None) => Self::Migrated { base_revision },
            (None, None) => Self::Untracked,
        })
    }

    /// Recorded revision, which takes precedence over a snapshot.
    pub fn base_revision(&self) -> Option<&str> {
        match self {
            Self::Untracked => None,
            Self::Migrated { base_revision } => Some(base_revision),
            Self::NeedsMigration { base_revision, .. } => base_revision.as_deref(),
        }
    }

    pub fn snapshot(&self) -> Option<&LegacySnapshot> {
        match self {
            Self::NeedsMigration { snapshot, .. } => Some(snapshot),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::MemoryStateStore;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn snapshot_path_is_hidden_sibling() {
        let path = LegacySnapshot::path_for(Path::new("/w/agents/review.agent.md")).unwrap();
        assert_eq!(path, PathBuf::from("/w/agents/.review.agent.md.base"));
    }

    #[test]
    fn resolves_each_generation() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("a.agent.md");
        let store = MemoryStateStore::new();

        assert_eq!(
            Tracking::resolve(&store, "k", Scope::Workspace, &target).unwrap(),
            Tracking::Untracked
        );

        store.update("k", "r1", Scope::Workspace).unwrap();
        assert_eq!(
            Tracking::resolve(&store, "k", Scope::Workspace, &target).unwrap(),
            Tracking::Migrated {
                base_revision: "r1".into()
            }
        );

        fs::write(temp.path().join(".a.agent.md.base"), "snap").unwrap();
        let tracking = Tracking::resolve(&store, "k", Scope::Workspace, &target).unwrap();
        assert_eq!(tracking.base_revision(), Some("r1"));
        assert_eq!(tracking.snapshot().unwrap().content, b"snap".to_vec());
    }

    #[test]
    fn record_in_other_scope_is_not_seen() {
        let temp = TempDir::new().unwrap();
        let store = MemoryStateStore::new();
        store.update("k", "r1", Scope::Global).unwrap();

        let tracking =
            Tracking::resolve(&store, "k", Scope::Workspace, &temp.path().join("a.md")).unwrap();
        assert_eq!(tracking, Tracking::Untracked);
    }
}
