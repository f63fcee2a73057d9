//! Command-line interface module for clean-folder.
//!
//! Parses arguments, validates the target folder, resolves configuration and
//! hands off to [`sort_folder`].

use crate::config::{Config, ConfigError};
use crate::output::OutputFormatter;
use crate::sorter::{RunSummary, SortOptions, sort_folder};
use clap::Parser;
use std::path::{Path, PathBuf};

/// Sort a folder into audio, documents, images, video, archives and other.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "clean-folder", version, about)]
pub struct Cli {
    /// Folder to sort.
    pub path: Option<PathBuf>,

    /// Configuration file (defaults to .cleanfolderrc.toml, then
    /// ~/.config/clean-folder/config.toml).
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Worker threads, overriding the configuration.
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..))]
    pub workers: Option<u16>,

    /// Do not draw a progress bar.
    #[arg(long)]
    pub no_progress: bool,

    /// Log every step, not only failures.
    #[arg(short, long)]
    pub verbose: bool,
}

/// The three ways a run can end.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// No folder argument was given.
    NoPath,
    /// The folder does not exist or is not a directory.
    Missing(PathBuf),
    /// The folder was sorted. Individual failures are only logged.
    Sorted(Box<RunSummary>),
}

impl RunOutcome {
    /// The fixed message printed for this outcome.
    pub fn message(&self) -> &'static str {
        match self {
            RunOutcome::NoPath => "No path to folder",
            RunOutcome::Missing(_) => "Folder doesn't exist",
            RunOutcome::Sorted(_) => "Sorted successfully",
        }
    }

    /// The run summary, if the folder was sorted.
    pub fn summary(&self) -> Option<&RunSummary> {
        match self {
            RunOutcome::Sorted(summary) => Some(summary.as_ref()),
            _ => None,
        }
    }
}

impl std::fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Resolves run options from configuration and command-line overrides.
pub fn resolve_options(cli: &Cli) -> Result<SortOptions, ConfigError> {
    let config = Config::load(cli.config.as_deref())?;
    let mut options = SortOptions::from_config(&config)?;
    if let Some(workers) = cli.workers {
        options.workers = usize::from(workers);
    }
    options.show_progress = !cli.no_progress;
    Ok(options)
}

/// Runs the CLI application.
///
/// Input problems end the run before anything on disk is touched. A
/// configuration error is returned as `Err`; everything else is an outcome.
///
/// ```no_run
/// use clap::Parser;
/// use clean_folder::cli::{Cli, run_cli};
///
/// let cli = Cli::parse_from(["clean-folder", "/path/to/Downloads"]);
/// match run_cli(&cli) {
///     Ok(outcome) => println!("{outcome}"),
///     Err(e) => eprintln!("Error: {e}"),
/// }
/// ```
pub fn run_cli(cli: &Cli) -> Result<RunOutcome, ConfigError> {
    let Some(path) = cli.path.as_deref() else {
        return Ok(RunOutcome::NoPath);
    };
    if !path.is_dir() {
        return Ok(RunOutcome::Missing(path.to_path_buf()));
    }

    let options = resolve_options(cli)?;
    Ok(sort_with_options(path, &options))
}

/// Sorts a validated folder and prints the summary.
pub fn sort_with_options(path: &Path, options: &SortOptions) -> RunOutcome {
    OutputFormatter::info(&format!("Sorting contents of: {}", path.display()));
    let summary = sort_folder(path, options);
    OutputFormatter::summary_table(&summary);
    RunOutcome::Sorted(Box::new(summary))
}
