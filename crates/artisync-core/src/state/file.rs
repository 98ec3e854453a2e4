//! JSON-file backed state store

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde::{Deserialize, Serialize};

use super::{Scope, StateStore};
use crate::{Error, Result};

const WORKSPACE_FILE: &str = "workspace-state.json";
const GLOBAL_FILE: &str = "global-state.json";

/// On-disk layout of one scope
#[derive(Debug, Default, Serialize, Deserialize)]
struct StateDocument {
    /// Format version for forward compatibility
    version: u32,
    entries: BTreeMap<String, String>,
}

/// State store persisting each scope as a JSON document.
///
/// The workspace scope lives in `<workspace_dir>/workspace-state.json`, the
/// global scope in `<global_dir>/global-state.json`. Every access goes to
/// disk under an advisory lock on a `.lock` sidecar, so several processes
/// can share the same files. Writes replace the document atomically.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    workspace_dir: PathBuf,
    global_dir: PathBuf,
}

impl FileStateStore {
    pub fn new(workspace_dir: impl Into<PathBuf>, global_dir: impl Into<PathBuf>) -> Self {
        Self {
            workspace_dir: workspace_dir.into(),
            global_dir: global_dir.into(),
        }
    }

    /// Path of the JSON document backing `scope`.
    pub fn document_path(&self, scope: Scope) -> PathBuf {
        match scope {
            Scope::Workspace => self.workspace_dir.join(WORKSPACE_FILE),
            Scope::Global => self.global_dir.join(GLOBAL_FILE),
        }
    }

    fn lock_path(document: &Path) -> PathBuf {
        let mut name = document.as_os_str().to_os_string();
        name.push(".lock");
        PathBuf::from(name)
    }

    fn open_lock(document: &Path) -> Result<File> {
        if let Some(parent) = document.parent() {
            fs::create_dir_all(parent).map_err(|e| artisync_fs::Error::io(parent, e))?;
        }
        let lock_path = Self::lock_path(document);
        OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| artisync_fs::Error::io(&lock_path, e).into())
    }

    /// Read the document; a missing file is an empty document.
    fn read_document(document: &Path) -> Result<StateDocument> {
        match fs::read(document) {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| Error::State {
                message: format!("corrupt state file {}: {e}", document.display()),
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(StateDocument::default()),
            Err(e) => Err(artisync_fs::Error::io(document, e).into()),
        }
    }
}

fn lock_failed(path: &Path) -> Error {
    artisync_fs::Error::LockFailed {
        path: path.to_path_buf(),
    }
    .into()
}

impl StateStore for FileStateStore {
    fn get(&self, key: &str, scope: Scope) -> Result<Option<String>> {
        let document = self.document_path(scope);
        if !document.exists() {
            return Ok(None);
        }

        let lock = Self::open_lock(&document)?;
        lock.lock_shared().map_err(|_| lock_failed(&document))?;
        let mut state = Self::read_document(&document)?;
        // Lock released when `lock` is dropped
        Ok(state.entries.remove(key))
    }

    fn update(&self, key: &str, value: &str, scope: Scope) -> Result<()> {
        let document = self.document_path(scope);

        // Exclusive for the whole read-modify-write cycle
        let lock = Self::open_lock(&document)?;
        lock.lock_exclusive().map_err(|_| lock_failed(&document))?;

        let mut state = Self::read_document(&document)?;
        state.version = 1;
        state.entries.insert(key.to_string(), value.to_string());

        let content = serde_json::to_vec_pretty(&state)?;
        artisync_fs::io::write_atomic(&document, &content)?;

        tracing::trace!(key, %scope, file = %document.display(), "State updated");
        Ok(())
    }
}
