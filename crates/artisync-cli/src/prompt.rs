//! Interactive conflict resolution
//!
//! Uses dialoguer for terminal-based interactive selection.

use std::path::Path;

use artisync_core::{Artifact, ConflictResolver, Error, Resolution};
use colored::Colorize;
use dialoguer::Select;

/// Choices offered for a conflicted file, in display order
const CHOICES: &[(&str, Resolution)] = &[
    ("Override", Resolution::Override),
    ("Keep merged / fix manually", Resolution::Manual),
    ("Cancel", Resolution::Cancel),
];

/// Shows the conflict-marked file and asks the user what to do.
#[derive(Debug, Default)]
pub struct PromptResolver;

impl ConflictResolver for PromptResolver {
    fn resolve(&self, artifact: &Artifact, target: &Path) -> artisync_core::Result<Resolution> {
        let merged = artisync_fs::io::read_bytes(target)?;

        println!();
        println!(
            "{} Conflicting changes in {} ({})",
            "!".yellow().bold(),
            artifact.name.cyan(),
            target.display()
        );
        println!();
        for line in String::from_utf8_lossy(&merged).lines() {
            if line.starts_with("<<<<<<<") || line.starts_with("=======") || line.starts_with(">>>>>>>")
            {
                println!("{}", line.red());
            } else {
                println!("{line}");
            }
        }
        println!();

        let labels: Vec<&str> = CHOICES.iter().map(|(label, _)| *label).collect();
        let index = Select::new()
            .with_prompt("How should this conflict be resolved?")
            .items(&labels)
            .default(0)
            .interact()
            .map_err(|e| Error::Resolver {
                message: e.to_string(),
            })?;

        Ok(CHOICES[index].1)
    }
}
