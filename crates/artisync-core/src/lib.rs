//! Install and update engine for artisync
//!
//! Keeps locally installed agent and skill documents in step with the
//! repositories they were published from, without discarding local edits:
//!
//! - **Provenance**: each install records the source revision it came from
//!   in a [`StateStore`], scoped per workspace or globally by a [`ScopePolicy`]
//! - **Updates**: [`UpdateEngine::update_item`] overwrites unmodified files
//!   and three-way merges modified ones, escalating conflicts to a
//!   [`ConflictResolver`]
//! - **Migration**: legacy `.<name>.base` snapshots are consumed and replaced
//!   by revision tracking on the first successful update
//!
//! # Architecture
//!
//! ```text
//!                 CLI
//!                  |
//!            artisync-core
//!                  |
//!         +--------+--------+
//!         |                 |
//!    artisync-fs      artisync-git
//! ```

pub mod artifact;
pub mod config;
pub mod engine;
pub mod error;
pub mod resolver;
pub mod scope;
pub mod session;
pub mod state;
pub mod tracking;

pub use artifact::{Artifact, ArtifactKind};
pub use config::Settings;
pub use engine::{BatchEntry, BatchStatus, ItemStatus, UpdateEngine, UpdateOutcome};
pub use error::{Error, Result};
pub use resolver::{ConflictResolver, FixedResolver, Resolution, ResolverCall};
pub use scope::{GlobalRoots, ScopePolicy};
pub use state::{
    DEFAULT_KEY_NAMESPACE, FileStateStore, MemoryStateStore, Scope, StateStore, state_key,
};
pub use tracking::{LegacySnapshot, Tracking};

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn source_resolution_error_names_artifact_and_cause() {
        let error = Error::SourceResolution {
            artifact: "octo/prompts:agents/review.agent.md".into(),
            source: artisync_git::Error::NotARepository {
                path: PathBuf::from("/tmp/nowhere"),
            },
        };

        let display = error.to_string();
        assert!(display.contains("octo/prompts:agents/review.agent.md"), "got: {display}");
        assert!(display.contains("/tmp/nowhere"), "got: {display}");
    }

    #[test]
    fn fs_errors_are_transparent() {
        let inner = artisync_fs::Error::LockFailed {
            path: PathBuf::from("state.json"),
        };
        let expected = inner.to_string();
        let error: Error = inner.into();
        assert_eq!(error.to_string(), expected);
    }
}
