//! Run orchestrator for the whole report workflow
//!
//! This module provides:
//! - Workflow coordination: read manifest → fill installed → fill latest → reconcile
//! - Bounded concurrent latest-version queries
//! - Best-effort handling of version query failures

use crate::domain::{Ledger, ProjectKind};
use crate::error::{AppError, SourceError};
use crate::manifest::open_project;
use crate::progress::Progress;
use crate::reconcile::{reconcile, ReconcilePolicy, Reconciliation};
use crate::source::{create_source, Programs, SystemCommandRunner, VersionSource, DEFAULT_TIMEOUT};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};

/// Default number of concurrent latest-version queries
pub const DEFAULT_JOBS: usize = 8;

/// Configuration for a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Project root directory
    pub root: PathBuf,
    /// Project kind
    pub kind: ProjectKind,
    /// Timeout for every external command
    pub timeout: Duration,
    /// Maximum concurrent latest-version queries (at least 1)
    pub jobs: usize,
    /// Classification rules
    pub policy: ReconcilePolicy,
    /// External program names
    pub programs: Programs,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            kind: ProjectKind::default(),
            timeout: DEFAULT_TIMEOUT,
            jobs: DEFAULT_JOBS,
            policy: ReconcilePolicy::default(),
            programs: Programs::default(),
        }
    }
}

/// A version query that failed; the affected versions stay unknown
#[derive(Debug, Error)]
pub enum QueryFailure {
    /// The bulk installed-version query failed
    #[error("installed versions unavailable: {0}")]
    Installed(#[source] SourceError),

    /// The latest-version query of one package failed
    #[error("latest version of {package} unavailable: {error}")]
    Latest {
        package: String,
        #[source]
        error: SourceError,
    },

    /// The latest-version task of one package panicked or was cancelled
    #[error("latest version query for {package} did not complete: {source}")]
    Interrupted {
        package: String,
        #[source]
        source: JoinError,
    },
}

/// Result of a run
#[derive(Debug)]
pub struct RunResult {
    /// Project kind the run was made for
    pub kind: ProjectKind,
    /// Every package with the versions that could be determined
    pub ledger: Ledger,
    /// Classified packages
    pub reconciliation: Reconciliation,
    /// Version queries that failed
    pub failures: Vec<QueryFailure>,
}

impl RunResult {
    /// Classify a filled ledger into a result without failures
    pub fn from_ledger(kind: ProjectKind, ledger: Ledger, policy: ReconcilePolicy) -> Self {
        let reconciliation = reconcile(&ledger, policy);
        Self {
            kind,
            ledger,
            reconciliation,
            failures: Vec::new(),
        }
    }
}

/// Orchestrator for coordinating a run
pub struct Orchestrator {
    config: RunConfig,
    source: Arc<dyn VersionSource>,
}

impl Orchestrator {
    /// Create an orchestrator that queries the real package manager tools
    pub fn new(config: RunConfig) -> Self {
        let runner = Arc::new(SystemCommandRunner::with_timeout(config.timeout));
        let source = create_source(config.kind, &config.root, &config.programs, runner);
        Self { config, source }
    }

    /// Create an orchestrator with a custom version source
    pub fn with_source(config: RunConfig, source: Arc<dyn VersionSource>) -> Self {
        Self { config, source }
    }

    /// The configuration of this run
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run the workflow without progress display
    pub async fn run(&self) -> Result<RunResult, AppError> {
        self.run_with_progress(Progress::disabled()).await
    }

    /// Run the workflow, reporting progress.
    ///
    /// Only manifest and specification problems are returned as errors;
    /// failed version queries are recorded in [`RunResult::failures`].
    pub async fn run_with_progress(&self, mut progress: Progress) -> Result<RunResult, AppError> {
        let kind = self.config.kind;

        // Step 1: Read the manifest
        let project = open_project(kind, &self.config.root);
        let packages = project.packages()?;
        tracing::info!(
            manifest = %project.manifest_path().display(),
            packages = packages.len(),
            "read manifest"
        );
        let mut ledger = Ledger::from_packages(packages);
        let mut failures = Vec::new();

        // Step 2: Installed versions, one bulk query
        progress.installed_query(kind.display_name());
        match self.source.fetch_installed(&ledger.names()).await {
            Ok(installed) => {
                let matched =
                    ledger.apply_installed(installed.iter().map(|(n, v)| (n.as_str(), v.as_str())));
                tracing::info!(reported = installed.len(), matched, "installed versions");
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not determine installed versions");
                failures.push(QueryFailure::Installed(e));
            }
        }
        progress.clear();

        // Step 3: Latest versions, one query per package
        progress.latest_queries(ledger.len());
        let (found, latest_failures) = self.fetch_latest(ledger.names(), &progress).await;
        progress.clear();

        let mut resolved = 0;
        for (name, version) in found {
            if ledger.set_latest(&name, version) {
                resolved += 1;
            }
        }
        tracing::info!(resolved, failed = latest_failures.len(), "latest versions");
        failures.extend(latest_failures);

        // Step 4: Classify
        let reconciliation = reconcile(&ledger, self.config.policy);

        Ok(RunResult {
            kind,
            ledger,
            reconciliation,
            failures,
        })
    }

    /// Query latest versions with at most `jobs` queries in flight.
    ///
    /// Each task owns only a package name; results are attributed back by
    /// name and applied by the caller. A task that does not complete is
    /// attributed through its task id.
    async fn fetch_latest(
        &self,
        names: Vec<String>,
        progress: &Progress,
    ) -> (Vec<(String, String)>, Vec<QueryFailure>) {
        let semaphore = Arc::new(Semaphore::new(self.config.jobs.max(1)));
        let mut tasks = JoinSet::new();
        let mut task_names = HashMap::new();

        for name in names {
            let source = Arc::clone(&self.source);
            let semaphore = Arc::clone(&semaphore);
            let package = name.clone();
            let handle = tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                let result = source.fetch_latest(&package).await;
                (package, result)
            });
            task_names.insert(handle.id(), name);
        }

        let mut found = Vec::new();
        let mut failures = Vec::new();

        while let Some(joined) = tasks.join_next().await {
            let (name, result) = match joined {
                Ok(outcome) => outcome,
                Err(e) => {
                    let package = task_names.remove(&e.id()).unwrap_or_default();
                    tracing::warn!(package = %package, error = %e, "latest version task did not complete");
                    progress.finished(&package);
                    failures.push(QueryFailure::Interrupted { package, source: e });
                    continue;
                }
            };
            progress.finished(&name);

            match result {
                Ok(Some(version)) => found.push((name, version)),
                Ok(None) => tracing::debug!(package = %name, "no latest version reported"),
                Err(error) => {
                    tracing::warn!(package = %name, error = %error, "latest version query failed");
                    failures.push(QueryFailure::Latest {
                        package: name,
                        error,
                    });
                }
            }
        }

        (found, failures)
    }
}
