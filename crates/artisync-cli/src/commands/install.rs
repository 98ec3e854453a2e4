//! Install command implementation

use std::path::Path;

use artisync_core::{FixedResolver, Resolution, Settings};
use colored::Colorize;

use crate::context;
use crate::error::Result;

/// Install the artifact at `source` into `install_dir`
pub fn run_install(
    settings: &Settings,
    source: &Path,
    install_dir: &Path,
    base_dir: Option<&str>,
    name: Option<&str>,
) -> Result<()> {
    let engine = context::engine(settings, Box::new(FixedResolver::new(Resolution::Cancel)))?;

    let mut artifact = context::artifact_from_source(engine.vcs(), source)?;
    if let Some(base_dir) = base_dir {
        artifact.base_directory = Some(base_dir.to_string());
    }
    if let Some(name) = name {
        artifact.name = name.to_string();
    }

    let target = engine.install_item(&artifact, install_dir)?;

    println!(
        "{} Installed {} {} to {}",
        "OK".green().bold(),
        artifact.kind,
        artifact.name.cyan(),
        target.display()
    );
    Ok(())
}
