//! Command implementations for artisync-cli

pub mod install;
pub mod mirror;
pub mod status;
pub mod update;

pub use install::run_install;
pub use mirror::{run_mirror, run_mirror_name};
pub use status::run_status;
pub use update::run_update;
