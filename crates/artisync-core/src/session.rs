//! Scoped temporary files for a single update
//!
//! Both guards clean up in `Drop`, so every exit path of an update, including
//! early returns through `?`, leaves no temporary or backup file behind.
//! Cleanup is best-effort and never panics.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::TempPath;

use crate::Result;

/// Content staged in the OS temp directory for the merge tool.
///
/// Named `<role>_<millis>_<random>_<file name>` so concurrent updates of
/// different targets never share a file. Removed on drop.
#[derive(Debug)]
pub struct StagedFile {
    path: TempPath,
}

impl StagedFile {
    pub fn create(role: &str, target: &Path, content: &[u8]) -> Result<Self> {
        let file_name = target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let prefix = format!("{role}_{}_", chrono::Utc::now().timestamp_millis());

        let mut file = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(&format!("_{file_name}"))
            .tempfile()?;
        file.write_all(content)?;
        file.flush()?;

        Ok(Self {
            path: file.into_temp_path(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Copy of an install target taken before it is modified.
///
/// Lives at `<target>.bak`. Consumed by [`Backup::restore`] or
/// [`Backup::discard`]; if dropped while still armed (an error unwound past
/// it), the target is restored first and the backup removed afterwards.
#[derive(Debug)]
pub struct Backup {
    target: PathBuf,
    backup: PathBuf,
    armed: bool,
}

impl Backup {
    pub fn path_for(target: &Path) -> PathBuf {
        let mut name = target.as_os_str().to_os_string();
        name.push(".bak");
        PathBuf::from(name)
    }

    /// Copy `target` to its backup location.
    pub fn take(target: &Path) -> Result<Self> {
        let backup = Self::path_for(target);
        artisync_fs::io::copy_atomic(target, &backup)?;
        tracing::debug!(target = %target.display(), backup = %backup.display(), "Backup taken");
        Ok(Self {
            target: target.to_path_buf(),
            backup,
            armed: true,
        })
    }

    /// Put the original content back and remove the backup.
    pub fn restore(mut self) -> Result<()> {
        self.armed = false;
        artisync_fs::io::copy_atomic(&self.backup, &self.target)?;
        artisync_fs::io::remove_quietly(&self.backup);
        Ok(())
    }

    /// Keep the target as it is and remove the backup.
    pub fn discard(mut self) {
        self.armed = false;
        artisync_fs::io::remove_quietly(&self.backup);
    }
}

impl Drop for Backup {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match artisync_fs::io::copy_atomic(&self.backup, &self.target) {
            Ok(()) => {
                tracing::debug!(target = %self.target.display(), "Target restored from backup");
                artisync_fs::io::remove_quietly(&self.backup);
            }
            // The backup is the only intact copy left
            Err(e) => tracing::error!(
                target = %self.target.display(),
                backup = %self.backup.display(),
                error = %e,
                "Failed to restore target; backup kept"
            ),
        }
    }
}
