use clap::Parser;
use clean_folder::cli::{Cli, RunOutcome, run_cli};
use clean_folder::output::OutputFormatter;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "clean_folder=debug"
    } else {
        "clean_folder=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run_cli(&cli) {
        Ok(outcome @ RunOutcome::Sorted(_)) => {
            OutputFormatter::success(outcome.message());
            ExitCode::SUCCESS
        }
        Ok(outcome) => {
            OutputFormatter::error(outcome.message());
            ExitCode::FAILURE
        }
        Err(e) => {
            OutputFormatter::error(&format!("Error: {}", e));
            ExitCode::FAILURE
        }
    }
}
