//! artisync CLI
//!
//! Installs agent and skill documents from mirrored source repositories and
//! keeps the installed copies up to date without losing local edits.

mod cli;
mod commands;
mod context;
mod error;
mod prompt;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    // Logs go to stderr; stdout carries command output
    let builder = FmtSubscriber::builder()
        .with_writer(std::io::stderr)
        .with_target(verbose);
    let result = if verbose {
        tracing::subscriber::set_global_default(builder.with_max_level(Level::DEBUG).finish())
    } else {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        tracing::subscriber::set_global_default(builder.with_env_filter(filter).finish())
    };
    if let Err(e) = result {
        eprintln!("{}: could not install logger: {e}", "warning".yellow().bold());
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);
    tracing::debug!("Verbose mode enabled");

    match cli.command {
        Some(cmd) => execute_command(cmd, cli.config.as_ref()),
        None => {
            // No command provided - show help hint
            println!("{} Artifact sync CLI", "artisync".green().bold());
            println!();
            println!("Run {} for available commands.", "artisync --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(cmd: Commands, config: Option<&std::path::PathBuf>) -> Result<()> {
    // Needs no settings, and must work with a broken settings file
    if let Commands::MirrorName { url } = &cmd {
        return commands::run_mirror_name(url);
    }

    let settings = context::settings(config)?;
    match cmd {
        Commands::Mirror { url } => commands::run_mirror(&settings, &url),
        Commands::MirrorName { url } => commands::run_mirror_name(&url),
        Commands::Install {
            source,
            install_dir,
            base_dir,
            name,
        } => commands::run_install(
            &settings,
            &source,
            &install_dir,
            base_dir.as_deref(),
            name.as_deref(),
        ),
        Commands::Update {
            source,
            target,
            on_conflict,
        } => commands::run_update(&settings, &source, &target, on_conflict),
        Commands::Status {
            source,
            target,
            json,
        } => commands::run_status(&settings, &source, &target, json),
    }
}
