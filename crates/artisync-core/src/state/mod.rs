//! Persistence of install records
//!
//! A [`StateStore`] is a plain string key/value store split into a
//! workspace and a global partition. The engine stores one entry per install
//! target, keyed by [`state_key`], whose value is the source revision of the
//! last successful sync.

mod file;
mod memory;

pub use file::FileStateStore;
pub use memory::MemoryStateStore;

use std::path::Path;

use artisync_fs::NormalizedPath;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Key namespace for install records unless configured otherwise
pub const DEFAULT_KEY_NAMESPACE: &str = "itemSha";

/// Partition of the state store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Tied to the current workspace
    Workspace,
    /// Shared by every workspace of the user
    Global,
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Workspace => write!(f, "workspace"),
            Self::Global => write!(f, "global"),
        }
    }
}

/// Scoped key/value persistence.
///
/// Implementations hold no business logic. Methods take `&self`; stores that
/// mutate in memory use interior mutability.
pub trait StateStore {
    fn get(&self, key: &str, scope: Scope) -> Result<Option<String>>;

    fn update(&self, key: &str, value: &str, scope: Scope) -> Result<()>;
}

impl<T: StateStore + ?Sized> StateStore for &T {
    fn get(&self, key: &str, scope: Scope) -> Result<Option<String>> {
        (**self).get(key, scope)
    }

    fn update(&self, key: &str, value: &str, scope: Scope) -> Result<()> {
        (**self).update(key, value, scope)
    }
}

/// Build the state key of an install target: `<namespace>:<absolute path>`.
///
/// Relative targets are made absolute against the working directory and
/// separators are normalized to `/`, so equivalent spellings share a key.
pub fn state_key(namespace: &str, target: &Path) -> String {
    let absolute = std::path::absolute(target).unwrap_or_else(|_| target.to_path_buf());
    format!("{namespace}:{}", NormalizedPath::new(absolute))
}
