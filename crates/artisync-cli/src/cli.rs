//! CLI argument parsing using clap derive

use std::path::PathBuf;

use artisync_core::Resolution;
use clap::{Parser, Subcommand, ValueEnum};

/// artisync - Keep installed agents and skills in sync with their sources
#[derive(Parser, Debug)]
#[command(name = "artisync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file (TOML, JSON or YAML)
    #[arg(short, long, global = true, env = "ARTISYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Clone or fast-forward the local mirror of a source repository
    Mirror {
        /// Repository URL
        url: String,
    },

    /// Print the mirror directory name for a repository URL
    MirrorName {
        /// Repository URL
        url: String,
    },

    /// Install an artifact from a mirror checkout
    ///
    /// Examples:
    ///   artisync install ~/.local/share/artisync/repos/octo_prompts_1a2b3c/agents/review.agent.md .github/agents
    ///   artisync install mirror/skills/lint/SKILL.md .github/skills --base-dir lint
    Install {
        /// Artifact file inside a mirror
        source: PathBuf,

        /// Directory to install into
        install_dir: PathBuf,

        /// Install under this folder (overrides the detected one)
        #[arg(long)]
        base_dir: Option<String>,

        /// Display name of the artifact
        #[arg(long)]
        name: Option<String>,
    },

    /// Update an installed artifact from its mirror
    Update {
        /// Artifact file inside a mirror
        source: PathBuf,

        /// Installed copy to update
        target: PathBuf,

        /// How to handle merge conflicts
        #[arg(long, value_enum, default_value_t = ConflictChoice::Prompt)]
        on_conflict: ConflictChoice,
    },

    /// Show whether an installed artifact is modified or outdated
    Status {
        /// Artifact file inside a mirror
        source: PathBuf,

        /// Installed copy to inspect
        target: PathBuf,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}

/// Conflict handling for `update`
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictChoice {
    /// Ask interactively
    Prompt,
    /// Take the upstream content
    Override,
    /// Keep the local file unchanged
    Cancel,
    /// Leave conflict markers in the file
    Manual,
}

impl ConflictChoice {
    /// Fixed decision, or `None` when the user should be asked.
    pub fn fixed(self) -> Option<Resolution> {
        match self {
            Self::Prompt => None,
            Self::Override => Some(Resolution::Override),
            Self::Cancel => Some(Resolution::Cancel),
            Self::Manual => Some(Resolution::Manual),
        }
    }
}
