//! Error types for artisync-git

use std::path::PathBuf;

/// Result type for artisync-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in artisync-git operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Filesystem error: {0}")]
    Fs(#[from] artisync_fs::Error),

    #[error("Could not run '{program}': {source}")]
    ToolUnavailable {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{command}' failed (exit code {code}): {stderr}")]
    CommandFailed {
        command: String,
        code: i32,
        stderr: String,
    },

    #[error("'{command}' was terminated by a signal")]
    Terminated { command: String },

    #[error("Merge tool failed (exit code {code}): {stderr}")]
    MergeFailed { code: i32, stderr: String },

    #[error("Content of '{path}' at revision {revision} is unavailable: {reason}")]
    HistoricalContentUnavailable {
        revision: String,
        path: String,
        reason: String,
    },

    #[error("Not inside a git working tree: {path}")]
    NotARepository { path: PathBuf },

    #[error("Failed to sync mirror of {url}: {message}")]
    MirrorSyncFailed { url: String, message: String },
}

impl Error {
    /// Whether the backend itself could not execute the operation.
    ///
    /// These are the failures that move a [`GitAdapter`](crate::GitAdapter)
    /// onto its fallback backend. Errors reported by a tool that did run
    /// (unknown revision, unreachable remote) are not execution failures.
    pub fn is_execution_failure(&self) -> bool {
        matches!(
            self,
            Self::ToolUnavailable { .. } | Self::Terminated { .. } | Self::MergeFailed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_reported_errors_are_not_execution_failures() {
        let err = Error::CommandFailed {
            command: "git fetch".into(),
            code: 128,
            stderr: "fatal: unable to access".into(),
        };
        assert!(!err.is_execution_failure());
    }

    #[test]
    fn missing_tool_is_an_execution_failure() {
        let err = Error::ToolUnavailable {
            program: "git".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(err.is_execution_failure());
    }
}
