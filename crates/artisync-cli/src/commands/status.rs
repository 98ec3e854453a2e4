//! Status command implementation

use std::path::Path;

use artisync_core::{FixedResolver, ItemStatus, Resolution, Settings};
use colored::Colorize;

use crate::context;
use crate::error::Result;

/// Report the state of `target` relative to the artifact at `source`
pub fn run_status(settings: &Settings, source: &Path, target: &Path, json: bool) -> Result<()> {
    let engine = context::engine(settings, Box::new(FixedResolver::new(Resolution::Cancel)))?;
    let artifact = context::artifact_from_source(engine.vcs(), source)?;

    let status = engine.status(&artifact, target)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    let label = match &status {
        ItemStatus::Clean {
            up_to_date: true, ..
        } => status.to_string().green(),
        ItemStatus::NotInstalled | ItemStatus::BaseUnavailable => status.to_string().red(),
        _ => status.to_string().yellow(),
    };
    println!("{}: {}", artifact.name.cyan(), label);
    Ok(())
}
