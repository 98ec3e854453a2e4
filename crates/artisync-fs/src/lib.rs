//! Filesystem primitives for artisync
//!
//! Provides separator-normalized paths, atomic writes and format-agnostic
//! configuration loading.

pub mod checksum;
pub mod config;
pub mod error;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use error::{Error, Result};
pub use path::{NormalizedPath, sanitize_relative};
