//! CLI argument parsing module for uvbump

use crate::domain::ProjectKind;
use crate::orchestrator::{RunConfig, DEFAULT_JOBS};
use crate::reconcile::ReconcilePolicy;
use crate::source::Programs;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Parse a concurrency limit, rejecting zero
fn parse_jobs(s: &str) -> Result<usize, String> {
    let jobs: usize = s
        .trim()
        .parse()
        .map_err(|_| format!("invalid number of jobs: {}", s))?;
    if jobs == 0 {
        return Err("jobs must be at least 1".to_string());
    }
    Ok(jobs)
}

/// Report outdated dependency pins of uv and npm projects
#[derive(Parser, Debug, Clone)]
#[command(
    name = "uvbump",
    version,
    about = "Report outdated dependency pins of uv and npm projects"
)]
pub struct CliArgs {
    /// Project root directory
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Package manager of the project
    #[arg(long, value_enum, default_value_t = ProjectKind::Uv)]
    pub kind: ProjectKind,

    /// Timeout for each external command, in seconds
    #[arg(long, default_value_t = 20)]
    pub timeout: u64,

    /// Maximum number of concurrent latest-version queries
    #[arg(long, default_value_t = DEFAULT_JOBS, value_parser = parse_jobs)]
    pub jobs: usize,

    /// Report packages whose latest version is unknown as out of date
    #[arg(long)]
    pub count_unknown_latest: bool,

    // Output options
    /// Output the report in JSON format
    #[arg(long)]
    pub json: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable quiet mode - no progress, warnings only
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Enable verbose output (debug logging)
    #[arg(long)]
    pub verbose: bool,

    // External programs
    /// uv executable
    #[arg(long, default_value = "uv")]
    pub uv_bin: String,

    /// uvx executable
    #[arg(long, default_value = "uvx")]
    pub uvx_bin: String,

    /// Python interpreter used when `uv export` reports nothing
    #[arg(long, default_value = "python3")]
    pub python_bin: String,

    /// npm executable
    #[arg(long, default_value = "npm")]
    pub npm_bin: String,
}

impl CliArgs {
    /// Build the run configuration from the parsed arguments
    pub fn to_run_config(&self) -> RunConfig {
        RunConfig {
            root: self.root.clone(),
            kind: self.kind,
            timeout: Duration::from_secs(self.timeout),
            jobs: self.jobs,
            policy: ReconcilePolicy {
                require_latest: !self.count_unknown_latest,
            },
            programs: Programs {
                uv: self.uv_bin.clone(),
                uvx: self.uvx_bin.clone(),
                python: self.python_bin.clone(),
                npm: self.npm_bin.clone(),
            },
        }
    }

    /// Default log filter directive for the verbosity flags
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "warn"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}
