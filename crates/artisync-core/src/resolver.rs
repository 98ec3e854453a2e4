//! Conflict resolution
//!
//! When a three-way merge leaves conflict markers in an install target, the
//! engine hands the decision to a [`ConflictResolver`].

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::{Artifact, Error, Result};

/// What to do with a conflict-marked target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    /// Discard local edits and take the upstream content
    Override,
    /// Restore the target as it was before the update
    Cancel,
    /// Keep the conflict markers for the user to resolve by hand
    Manual,
}

impl std::str::FromStr for Resolution {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "override" => Ok(Self::Override),
            "cancel" => Ok(Self::Cancel),
            "manual" => Ok(Self::Manual),
            other => Err(Error::Resolver {
                message: format!("unknown resolution '{other}'"),
            }),
        }
    }
}

/// Decides how a conflicted update proceeds.
///
/// `target` already contains the merge result with conflict markers when
/// this is called.
pub trait ConflictResolver {
    fn resolve(&self, artifact: &Artifact, target: &Path) -> Result<Resolution>;
}

impl<T: ConflictResolver + ?Sized> ConflictResolver for Box<T> {
    fn resolve(&self, artifact: &Artifact, target: &Path) -> Result<Resolution> {
        (**self).resolve(artifact, target)
    }
}

impl<T: ConflictResolver + ?Sized> ConflictResolver for &T {
    fn resolve(&self, artifact: &Artifact, target: &Path) -> Result<Resolution> {
        (**self).resolve(artifact, target)
    }
}

/// One observed call to a [`FixedResolver`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverCall {
    pub artifact_id: String,
    pub target: PathBuf,
    /// Target content at the time of the call
    pub content: Vec<u8>,
}

/// Non-interactive resolver answering every conflict the same way.
///
/// Every call is recorded together with what the target looked like, which
/// lets callers inspect the conflict markers the user would have seen.
#[derive(Debug)]
pub struct FixedResolver {
    decision: Resolution,
    calls: Mutex<Vec<ResolverCall>>,
}

impl FixedResolver {
    pub fn new(decision: Resolution) -> Self {
        Self {
            decision,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Calls observed so far, oldest first.
    pub fn calls(&self) -> Vec<ResolverCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

impl ConflictResolver for FixedResolver {
    fn resolve(&self, artifact: &Artifact, target: &Path) -> Result<Resolution> {
        let content = artisync_fs::io::read_bytes(target)?;
        let mut calls = self.calls.lock().map_err(|_| Error::Resolver {
            message: "call log lock poisoned".to_string(),
        })?;
        calls.push(ResolverCall {
            artifact_id: artifact.id.clone(),
            target: target.to_path_buf(),
            content,
        });
        tracing::debug!(artifact = %artifact.id, decision = ?self.decision, "Conflict resolved");
        Ok(self.decision)
    }
}
