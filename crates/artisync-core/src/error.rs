//! Error types for artisync-core

/// Result type for artisync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in artisync-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The artifact's mirror, revision or path could not be determined.
    /// Raised before anything is written.
    #[error("Failed to resolve source for artifact '{artifact}': {source}")]
    SourceResolution {
        artifact: String,
        source: artisync_git::Error,
    },

    /// State store failure
    #[error("State store error: {message}")]
    State { message: String },

    /// Conflict resolver failure
    #[error("Conflict resolver error: {message}")]
    Resolver { message: String },

    /// Artifact descriptor is unusable
    #[error("Invalid artifact: {message}")]
    InvalidArtifact { message: String },

    // Transparent wrappers for underlying crate errors
    /// Git error from artisync-git
    #[error(transparent)]
    Git(#[from] artisync_git::Error),

    /// Filesystem error from artisync-fs
    #[error(transparent)]
    Fs(#[from] artisync_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
