//! Version sources for installed and latest package versions
//!
//! This module provides:
//! - The `VersionSource` capability used by the orchestrator
//! - Command execution with a per-call timeout
//! - uv source (`uv export`, pip list fallbacks, `uvx pip index versions`)
//! - npm source (`npm ls`, `npm view`)

mod command;
mod npm;
mod uv;

pub use command::{CommandLine, CommandRunner, SystemCommandRunner, DEFAULT_TIMEOUT};
pub use npm::{parse_npm_ls, NpmSource};
pub use uv::{parse_index_versions, parse_pip_list, parse_requirements_export, UvSource};

use crate::domain::ProjectKind;
use crate::error::SourceError;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

/// Installed `(name, version)` pairs in report order
pub type InstalledVersions = Vec<(String, String)>;

/// Trait for querying package versions
#[async_trait]
pub trait VersionSource: Send + Sync {
    /// Get the project kind this source handles
    fn kind(&self) -> ProjectKind;

    /// Fetch installed package versions with a bulk query.
    ///
    /// `packages` are the names the ledger knows. A source with several
    /// listing strategies moves on while none of them is reported.
    async fn fetch_installed(&self, packages: &[String]) -> Result<InstalledVersions, SourceError>;

    /// Fetch the newest published version of one package.
    ///
    /// `Ok(None)` means the query ran but reported no usable version.
    async fn fetch_latest(&self, package: &str) -> Result<Option<String>, SourceError>;
}

/// Names of the external programs used by the sources
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Programs {
    /// uv executable
    pub uv: String,
    /// uvx executable
    pub uvx: String,
    /// Python interpreter used for the `pip list` fallback
    pub python: String,
    /// npm executable
    pub npm: String,
}

impl Default for Programs {
    fn default() -> Self {
        Self {
            uv: "uv".to_string(),
            uvx: "uvx".to_string(),
            python: "python3".to_string(),
            npm: "npm".to_string(),
        }
    }
}

/// Create a version source for the given project kind
pub fn create_source(
    kind: ProjectKind,
    root: &Path,
    programs: &Programs,
    runner: Arc<dyn CommandRunner>,
) -> Arc<dyn VersionSource> {
    match kind {
        ProjectKind::Uv => Arc::new(UvSource::new(root, programs, runner)),
        ProjectKind::Npm => Arc::new(NpmSource::new(root, programs, runner)),
    }
}
