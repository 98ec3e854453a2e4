//! In-process state store

use std::collections::HashMap;
use std::sync::Mutex;

use super::{Scope, StateStore};
use crate::{Error, Result};

/// State store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    entries: Mutex<HashMap<(Scope, String), String>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records in `scope`.
    pub fn len(&self, scope: Scope) -> usize {
        self.entries
            .lock()
            .map(|entries| entries.keys().filter(|(s, _)| *s == scope).count())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.entries
            .lock()
            .map(|entries| entries.is_empty())
            .unwrap_or(true)
    }
}

fn poisoned() -> Error {
    Error::State {
        message: "in-memory state lock poisoned".to_string(),
    }
}

impl StateStore for MemoryStateStore {
    fn get(&self, key: &str, scope: Scope) -> Result<Option<String>> {
        let entries = self.entries.lock().map_err(|_| poisoned())?;
        Ok(entries.get(&(scope, key.to_string())).cloned())
    }

    fn update(&self, key: &str, value: &str, scope: Scope) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| poisoned())?;
        entries.insert((scope, key.to_string()), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scopes_are_independent() {
        let store = MemoryStateStore::new();
        store.update("k", "workspace-value", Scope::Workspace).unwrap();

        assert_eq!(
            store.get("k", Scope::Workspace).unwrap().as_deref(),
            Some("workspace-value")
        );
        assert_eq!(store.get("k", Scope::Global).unwrap(), None);
        assert_eq!(store.len(Scope::Workspace), 1);
        assert_eq!(store.len(Scope::Global), 0);
    }

    #[test]
    fn update_replaces_value() {
        let store = MemoryStateStore::new();
        store.update("k", "r1", Scope::Global).unwrap();
        store.update("k", "r2", Scope::Global).unwrap();

        assert_eq!(store.get("k", Scope::Global).unwrap().as_deref(), Some("r2"));
        assert_eq!(store.len(Scope::Global), 1);
    }
}
