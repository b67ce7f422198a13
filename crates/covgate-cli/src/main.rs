//! covgate: Go coverage pipeline with a threshold gate
//!
//! ## Usage
//!
//! ```bash
//! covgate                     # Run tests, profile, reports, threshold check
//! covgate check -t 85         # Only enforce 85% total coverage
//! covgate config --yaml       # Print a starter covgate.yaml
//! ```

use clap::Parser;
use covgate::{CovResult, OutputFormat};
use covgate_cli::{handlers, logging, Cli, Commands};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> CovResult<u8> {
    // Verbosity lives in the config, so logging starts only once it is loaded
    let config = cli.gate_config()?;
    logging::init_tracing(&config, cli.log_json);
    if let Some(path) = cli.config_file() {
        tracing::debug!(path = %path.display(), "loaded config file");
    }
    tracing::debug!(?config, "effective configuration");

    let format: OutputFormat = cli.format.into();
    match cli.command() {
        Commands::Run => handlers::execute_run(config, format),
        Commands::Check => handlers::execute_check(config, format),
        Commands::Config(args) => {
            handlers::execute_config(&config, &args)?;
            Ok(0)
        }
    }
}
