//! Runtime settings
//!
//! Settings are read through [`ConfigStore`], so a settings file may be TOML,
//! JSON or YAML. Every field has a default; an empty file is valid.

use std::path::{Path, PathBuf};

use artisync_fs::ConfigStore;
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::scope::GlobalRoots;
use crate::state::{DEFAULT_KEY_NAMESPACE, FileStateStore};

/// Directory name used under the platform data and config directories
pub const APP_DIR: &str = "artisync";

/// Directory holding workspace-scoped state, relative to the workspace root
pub const WORKSPACE_STATE_DIR: &str = ".artisync";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Root for mirrors (`<storage_dir>/repos/...`) and global state
    pub storage_dir: PathBuf,

    /// Directory for workspace state; `<cwd>/.artisync` when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_state_dir: Option<PathBuf>,

    /// Install targets under these roots are recorded in the global scope
    pub global_roots: Vec<PathBuf>,

    /// Prefix of state keys
    pub key_namespace: String,

    /// git executable used by the primary backend
    pub git_program: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage_dir: default_storage_dir(),
            workspace_state_dir: None,
            global_roots: Vec::new(),
            key_namespace: DEFAULT_KEY_NAMESPACE.to_string(),
            git_program: PathBuf::from("git"),
        }
    }
}

/// `<data dir>/artisync`, or `.artisync` in the working directory when the
/// platform has no data directory.
pub fn default_storage_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(WORKSPACE_STATE_DIR))
}

/// `<config dir>/artisync/config.toml`, if the platform has a config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
}

impl Settings {
    /// Load settings from `path`; the format follows the extension.
    pub fn load(path: &Path) -> Result<Self> {
        Ok(ConfigStore::new().load(path)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        Ok(ConfigStore::new().save(path, self)?)
    }

    /// Load from `path` if given, else from the default location if a file
    /// exists there, else fall back to defaults.
    pub fn discover(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => match default_config_path().filter(|p| p.is_file()) {
                Some(path) => {
                    tracing::debug!(config = %path.display(), "Loading default settings file");
                    Self::load(&path)
                }
                None => Ok(Self::default()),
            },
        }
    }

    /// Workspace state directory, resolved against `cwd` when unset.
    pub fn workspace_state_dir(&self, cwd: &Path) -> PathBuf {
        self.workspace_state_dir
            .clone()
            .unwrap_or_else(|| cwd.join(WORKSPACE_STATE_DIR))
    }

    pub fn state_store(&self, cwd: &Path) -> FileStateStore {
        FileStateStore::new(self.workspace_state_dir(cwd), self.storage_dir.clone())
    }

    pub fn scope_policy(&self) -> GlobalRoots {
        GlobalRoots::new(self.global_roots.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn empty_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "").unwrap();

        assert_eq!(Settings::load(&path).unwrap(), Settings::default());
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(&path, "key_namespace: customSha\nglobal_roots: [/home/u/prompts]\n").unwrap();

        let settings = Settings::load(&path).unwrap();

        assert_eq!(settings.key_namespace, "customSha");
        assert_eq!(settings.global_roots, vec![PathBuf::from("/home/u/prompts")]);
        assert_eq!(settings.git_program, PathBuf::from("git"));
    }

    #[test]
    fn save_then_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.json");
        let settings = Settings {
            storage_dir: temp.path().join("data"),
            workspace_state_dir: Some(temp.path().join("ws")),
            ..Settings::default()
        };

        settings.save(&path).unwrap();

        assert_eq!(Settings::load(&path).unwrap(), settings);
    }

    #[test]
    fn workspace_state_dir_defaults_under_cwd() {
        let settings = Settings::default();
        assert_eq!(
            settings.workspace_state_dir(Path::new("/proj")),
            PathBuf::from("/proj/.artisync")
        );
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        assert!(Settings::discover(Some(&temp.path().join("nope.toml"))).is_err());
    }
}
