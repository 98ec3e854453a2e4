//! Update command implementation

use std::path::Path;

use artisync_core::{ConflictResolver, FixedResolver, Settings, UpdateOutcome};
use colored::Colorize;

use crate::cli::ConflictChoice;
use crate::context;
use crate::error::Result;
use crate::prompt::PromptResolver;

/// Update `target` from the artifact at `source`
pub fn run_update(
    settings: &Settings,
    source: &Path,
    target: &Path,
    on_conflict: ConflictChoice,
) -> Result<()> {
    let resolver: Box<dyn ConflictResolver> = match on_conflict.fixed() {
        Some(decision) => Box::new(FixedResolver::new(decision)),
        None => Box::new(PromptResolver),
    };
    let engine = context::engine(settings, resolver)?;
    let artifact = context::artifact_from_source(engine.vcs(), source)?;

    match engine.update_item(&artifact, target)? {
        UpdateOutcome::Updated => println!(
            "{} Updated {} ({})",
            "OK".green().bold(),
            artifact.name.cyan(),
            target.display()
        ),
        UpdateOutcome::Cancelled => println!(
            "{} Update of {} cancelled; {} left unchanged",
            "--".yellow().bold(),
            artifact.name.cyan(),
            target.display()
        ),
    }
    Ok(())
}
