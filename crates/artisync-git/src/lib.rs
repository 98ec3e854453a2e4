//! Version-control adapter for artisync
//!
//! Wraps git to mirror artifact source repositories, read historical file
//! content and perform line-based three-way merges. Two execution backends
//! sit behind one contract:
//!
//! - [`CommandBackend`] drives the external `git` program (primary)
//! - [`LibraryBackend`] uses the embedded libgit2 library (fallback)
//!
//! [`GitAdapter`] tries the primary backend first and switches to the
//! fallback for the rest of its lifetime once the primary fails to execute.

pub mod adapter;
pub mod backend;
pub mod error;
pub mod naming;

pub use adapter::{GitAdapter, VersionControl};
pub use backend::{CommandBackend, GitBackend, LibraryBackend, MergeOutcome};
pub use error::{Error, Result};
pub use naming::mirror_name;
