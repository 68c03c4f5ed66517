//! uv version source
//!
//! Installed versions come from `uv export` (requirements.txt format). When
//! that reports none of the declared packages, `uv pip list` and
//! `python -m pip list` are tried in order. Latest versions come from `uvx pip index versions <package>`.

use crate::domain::ProjectKind;
use crate::error::SourceError;
use crate::source::{CommandLine, CommandRunner, InstalledVersions, Programs, VersionSource};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Marker on the second line of `pip index versions` output
const AVAILABLE_VERSIONS: &str = "Available versions:";

/// uv version source
pub struct UvSource {
    root: PathBuf,
    programs: Programs,
    runner: Arc<dyn CommandRunner>,
}

/// Output format of an installed-version listing command
#[derive(Debug, Clone, Copy)]
enum ListingFormat {
    RequirementsTxt,
    PipJson,
}

/// One entry of `pip list --format json`
#[derive(Debug, Deserialize)]
struct PipListEntry {
    name: Option<String>,
    version: Option<String>,
}

impl UvSource {
    /// Create a uv source for the project at `root`
    pub fn new(root: &Path, programs: &Programs, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            root: root.to_path_buf(),
            programs: programs.clone(),
            runner,
        }
    }

    fn export_command(&self) -> CommandLine {
        CommandLine::new(
            &self.programs.uv,
            [
                "export",
                "--locked",
                "--all-packages",
                "--all-groups",
                "--format",
                "requirements-txt",
                "--no-hashes",
            ],
        )
        .current_dir(&self.root)
    }

    fn installed_commands(&self) -> [(CommandLine, ListingFormat); 3] {
        [
            (self.export_command(), ListingFormat::RequirementsTxt),
            (
                CommandLine::new(&self.programs.uv, ["pip", "list", "--format", "json"])
                    .current_dir(&self.root),
                ListingFormat::PipJson,
            ),
            (
                CommandLine::new(
                    &self.programs.python,
                    ["-m", "pip", "list", "--format", "json"],
                )
                .current_dir(&self.root),
                ListingFormat::PipJson,
            ),
        ]
    }

    fn index_command(&self, package: &str) -> CommandLine {
        CommandLine::new(&self.programs.uvx, ["pip", "index", "versions", package])
    }
}

#[async_trait]
impl VersionSource for UvSource {
    fn kind(&self) -> ProjectKind {
        ProjectKind::Uv
    }

    async fn fetch_installed(&self, packages: &[String]) -> Result<InstalledVersions, SourceError> {
        let wanted: HashSet<&str> = packages.iter().map(String::as_str).collect();
        let mut unmatched = None;
        let mut last_error = None;

        for (command, format) in self.installed_commands() {
            let result = match self.runner.run(&command).await {
                Ok(stdout) => match format {
                    ListingFormat::RequirementsTxt => Ok(parse_requirements_export(&stdout)),
                    ListingFormat::PipJson => parse_pip_list(&stdout, &command),
                },
                Err(e) => Err(e),
            };
            match result {
                Ok(installed) if installed.iter().any(|(name, _)| wanted.contains(name.as_str())) => {
                    return Ok(installed);
                }
                Ok(installed) => {
                    tracing::debug!(
                        command = %command,
                        reported = installed.len(),
                        "no declared package in installed listing"
                    );
                    unmatched.get_or_insert(installed);
                }
                Err(e) => {
                    tracing::debug!(command = %command, error = %e, "installed version query failed");
                    last_error = Some(e);
                }
            }
        }

        match (unmatched, last_error) {
            (Some(installed), _) => Ok(installed),
            (None, Some(e)) => Err(e),
            (None, None) => Ok(Vec::new()),
        }
    }

    async fn fetch_latest(&self, package: &str) -> Result<Option<String>, SourceError> {
        let stdout = self.runner.run(&self.index_command(package)).await?;
        Ok(parse_index_versions(&stdout))
    }
}

/// Parse `uv export --format requirements-txt` output into name/version pairs.
///
/// Comment lines are skipped, environment markers after `;` are dropped and
/// only `name==version` pins are kept.
pub fn parse_requirements_export(output: &str) -> InstalledVersions {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let pin = line.split(';').next().unwrap_or(line).trim();
            let (name, version) = pin.split_once("==")?;
            Some((name.trim().to_string(), version.trim().to_string()))
        })
        .collect()
}

/// Parse `pip list --format json` output into name/version pairs
pub fn parse_pip_list(output: &str, command: &CommandLine) -> Result<InstalledVersions, SourceError> {
    let entries: Vec<PipListEntry> = serde_json::from_str(output)
        .map_err(|e| SourceError::invalid_output(command.to_string(), e.to_string()))?;

    Ok(entries
        .into_iter()
        .filter_map(|entry| match (entry.name, entry.version) {
            (Some(name), Some(version)) if !name.is_empty() && !version.is_empty() => {
                Some((name, version))
            }
            _ => None,
        })
        .collect())
}

/// Extract the newest version from `pip index versions` output.
///
/// The second line reads `Available versions: 2.31.0, 2.30.0, ...`; the
/// first listed version is the newest.
pub fn parse_index_versions(output: &str) -> Option<String> {
    let line = output.lines().nth(1)?;
    if !line.contains(AVAILABLE_VERSIONS) {
        return None;
    }
    let newest = line
        .replace(AVAILABLE_VERSIONS, "")
        .split(',')
        .next()?
        .trim()
        .to_string();
    (!newest.is_empty()).then_some(newest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::mock::ScriptedRunner;

    const EXPORT: &str = "uv export --locked --all-packages --all-groups --format requirements-txt --no-hashes";
    const UV_PIP_LIST: &str = "uv pip list --format json";
    const PYTHON_PIP_LIST: &str = "python3 -m pip list --format json";

    fn names(packages: &[&str]) -> Vec<String> {
        packages.iter().map(|p| p.to_string()).collect()
    }

    fn source(runner: ScriptedRunner) -> (UvSource, Arc<ScriptedRunner>) {
        let runner = Arc::new(runner);
        let source = UvSource::new(Path::new("/repo"), &Programs::default(), runner.clone());
        (source, runner)
    }

    #[test]
    fn test_parse_requirements_export() {
        let output = "\
# This file was autogenerated by uv via the following command:
#    uv export --format requirements-txt
-e ./packages/core
anyio==4.4.0
    # via httpx
colorama==0.4.6 ; sys_platform == 'win32'
requests==2.32.3
";
        let installed = parse_requirements_export(output);
        assert_eq!(
            installed,
            vec![
                ("anyio".to_string(), "4.4.0".to_string()),
                ("colorama".to_string(), "0.4.6".to_string()),
                ("requests".to_string(), "2.32.3".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_pip_list() {
        let cmd = CommandLine::new("uv", ["pip", "list"]);
        let output = r#"[{"name": "requests", "version": "2.32.3"}, {"name": "broken"}]"#;
        let installed = parse_pip_list(output, &cmd).unwrap();
        assert_eq!(installed, vec![("requests".to_string(), "2.32.3".to_string())]);
    }

    #[test]
    fn test_parse_pip_list_invalid_json() {
        let cmd = CommandLine::new("uv", ["pip", "list"]);
        let err = parse_pip_list("WARNING: not json", &cmd).unwrap_err();
        assert!(matches!(err, SourceError::InvalidOutput { .. }));
    }

    #[test]
    fn test_parse_index_versions() {
        let output = "requests (2.32.3)\nAvailable versions: 2.32.3, 2.32.2, 2.31.0\n  INSTALLED: 2.31.0\n";
        assert_eq!(parse_index_versions(output), Some("2.32.3".to_string()));
    }

    #[test]
    fn test_parse_index_versions_unexpected_output() {
        assert_eq!(parse_index_versions(""), None);
        assert_eq!(parse_index_versions("requests (2.32.3)"), None);
        assert_eq!(parse_index_versions("requests (2.32.3)\nsomething else"), None);
        assert_eq!(parse_index_versions("x (1)\nAvailable versions:  \n"), None);
    }

    #[tokio::test]
    async fn test_fetch_installed_from_export() {
        let (source, runner) = source(ScriptedRunner::new().reply(EXPORT, "requests==2.32.3\n"));
        let installed = source.fetch_installed(&names(&["requests"])).await.unwrap();
        assert_eq!(installed, vec![("requests".to_string(), "2.32.3".to_string())]);

        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].cwd, Some(PathBuf::from("/repo")));
    }

    #[tokio::test]
    async fn test_fetch_installed_falls_back_to_pip_list() {
        let (source, runner) = source(
            ScriptedRunner::new()
                .fail(EXPORT, 2)
                .reply(UV_PIP_LIST, r#"[{"name": "requests", "version": "2.31.0"}]"#),
        );
        let installed = source.fetch_installed(&names(&["requests"])).await.unwrap();
        assert_eq!(installed, vec![("requests".to_string(), "2.31.0".to_string())]);
        assert_eq!(runner.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_installed_falls_back_to_python() {
        let (source, _runner) = source(
            ScriptedRunner::new()
                .reply(EXPORT, "# nothing pinned\n")
                .reply(UV_PIP_LIST, "[]")
                .reply(PYTHON_PIP_LIST, r#"[{"name": "rich", "version": "13.7.1"}]"#),
        );
        let installed = source.fetch_installed(&names(&["rich"])).await.unwrap();
        assert_eq!(installed, vec![("rich".to_string(), "13.7.1".to_string())]);
    }

    #[tokio::test]
    async fn test_fetch_installed_falls_back_when_export_matches_nothing() {
        // The export spells the name differently from the manifest
        let (source, runner) = source(
            ScriptedRunner::new()
                .reply(EXPORT, "pyyaml==6.0.1\n")
                .reply(UV_PIP_LIST, r#"[{"name": "PyYAML", "version": "6.0.1"}]"#),
        );
        let installed = source.fetch_installed(&names(&["PyYAML"])).await.unwrap();
        assert_eq!(installed, vec![("PyYAML".to_string(), "6.0.1".to_string())]);
        assert_eq!(runner.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_installed_unmatched_listing_kept() {
        let (source, runner) = source(
            ScriptedRunner::new()
                .reply(EXPORT, "anyio==4.4.0\n")
                .fail(UV_PIP_LIST, 2),
        );
        let installed = source.fetch_installed(&names(&["requests"])).await.unwrap();
        assert_eq!(installed, vec![("anyio".to_string(), "4.4.0".to_string())]);
        assert_eq!(runner.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_fetch_installed_all_fail() {
        let (source, runner) = source(ScriptedRunner::new());
        let err = source.fetch_installed(&names(&["requests"])).await.unwrap_err();
        assert!(matches!(err, SourceError::ProgramNotFound { ref program } if program == "python3"));
        assert_eq!(runner.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_fetch_installed_empty_without_errors() {
        let (source, _runner) = source(
            ScriptedRunner::new()
                .reply(EXPORT, "")
                .reply(UV_PIP_LIST, "[]")
                .reply(PYTHON_PIP_LIST, "[]"),
        );
        assert!(source.fetch_installed(&names(&["requests"])).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_latest() {
        let (source, runner) = source(ScriptedRunner::new().reply(
            "uvx pip index versions requests",
            "requests (2.32.3)\nAvailable versions: 2.32.3, 2.32.2\n",
        ));
        let latest = source.fetch_latest("requests").await.unwrap();
        assert_eq!(latest, Some("2.32.3".to_string()));
        assert!(runner.calls()[0].cwd.is_none());
    }

    #[tokio::test]
    async fn test_fetch_latest_failure() {
        let (source, _runner) =
            source(ScriptedRunner::new().fail("uvx pip index versions nope", 1));
        assert!(source.fetch_latest("nope").await.is_err());
    }

    #[test]
    fn test_kind() {
        let (source, _runner) = source(ScriptedRunner::new());
        assert_eq!(source.kind(), ProjectKind::Uv);
    }
}
