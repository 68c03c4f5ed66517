//! uvbump - report outdated dependency pins of uv and npm projects
//!
//! Reads the declared versions from the project manifest, asks the package
//! manager for installed and newest versions and prints which pins are out
//! of date or can be bumped.

use clap::Parser;
use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use uvbump::cli::CliArgs;
use uvbump::error::{AppError, IoError};
use uvbump::orchestrator::Orchestrator;
use uvbump::output::{create_formatter, OutputConfig};
use uvbump::progress::Progress;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_logging(&args);

    // Run the main logic and handle errors
    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {}", e);
            match e.downcast_ref::<AppError>() {
                Some(app_error) => ExitCode::from(app_error.exit_code()),
                None => ExitCode::FAILURE,
            }
        }
    }
}

/// Log to stderr; `RUST_LOG` takes precedence over the verbosity flags
fn init_logging(args: &CliArgs) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,uvbump={}", args.log_level())));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr)
        .init();
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    let config = args.to_run_config();
    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        root = %config.root.display(),
        kind = %config.kind,
        "starting"
    );

    let show_progress = !args.quiet && !args.json && io::stderr().is_terminal();
    let orchestrator = Orchestrator::new(config);
    let result = orchestrator
        .run_with_progress(Progress::new(show_progress))
        .await?;

    // Output results
    let color = !args.no_color && io::stdout().is_terminal();
    let formatter = create_formatter(OutputConfig::from_cli(args.json, color));
    let mut stdout = io::stdout().lock();
    formatter
        .format(&result, &mut stdout)
        .and_then(|_| stdout.flush())
        .map_err(|source| AppError::from(IoError::Report { source }))?;

    if args.verbose && !result.failures.is_empty() {
        eprintln!();
        eprintln!("Queries that failed:");
        for failure in &result.failures {
            eprintln!("  - {}", failure);
        }
    }

    Ok(ExitCode::SUCCESS)
}
