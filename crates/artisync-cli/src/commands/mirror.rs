//! Mirror commands

use artisync_core::{FixedResolver, Resolution, Settings};
use artisync_git::mirror_name;
use colored::Colorize;

use crate::context;
use crate::error::Result;

/// Clone or fast-forward the mirror of `url` and print its path
pub fn run_mirror(settings: &Settings, url: &str) -> Result<()> {
    println!("{} Syncing mirror of {}...", "=>".blue().bold(), url.cyan());

    // Mirroring never merges, so the resolver is never consulted
    let engine = context::engine(settings, Box::new(FixedResolver::new(Resolution::Cancel)))?;
    let path = engine.sync_source(url)?;

    println!("{} {}", "OK".green().bold(), path.display());
    Ok(())
}

/// Print the mirror directory name of `url`
pub fn run_mirror_name(url: &str) -> Result<()> {
    println!("{}", mirror_name(url));
    Ok(())
}
