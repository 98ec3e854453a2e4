//! Shared test utilities for the artisync workspace.
//!
//! This crate provides standardised fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only and never published.
//!
//! # Modules
//!
//! - [`git`]: helpers for tests that drive the external `git` program
//! - [`upstream`]: [`UpstreamRepo`] builder for source repositories with history

pub mod git;
pub mod upstream;

pub use upstream::UpstreamRepo;
