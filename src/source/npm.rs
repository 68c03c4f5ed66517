//! npm version source
//!
//! Installed versions come from `npm ls --depth=0 --json`, latest versions
//! from `npm view <package> version`.

use crate::domain::ProjectKind;
use crate::error::SourceError;
use crate::source::{CommandLine, CommandRunner, InstalledVersions, Programs, VersionSource};
use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// npm version source
pub struct NpmSource {
    root: PathBuf,
    npm: String,
    runner: Arc<dyn CommandRunner>,
}

impl NpmSource {
    /// Create an npm source for the project at `root`
    pub fn new(root: &Path, programs: &Programs, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            root: root.to_path_buf(),
            npm: programs.npm.clone(),
            runner,
        }
    }
}

#[async_trait]
impl VersionSource for NpmSource {
    fn kind(&self) -> ProjectKind {
        ProjectKind::Npm
    }

    async fn fetch_installed(&self, _packages: &[String]) -> Result<InstalledVersions, SourceError> {
        let command =
            CommandLine::new(&self.npm, ["ls", "--depth=0", "--json"]).current_dir(&self.root);
        let stdout = self.runner.run(&command).await?;
        parse_npm_ls(&stdout, &command)
    }

    async fn fetch_latest(&self, package: &str) -> Result<Option<String>, SourceError> {
        let command =
            CommandLine::new(&self.npm, ["view", package, "version"]).current_dir(&self.root);
        let stdout = self.runner.run(&command).await?;
        let version = stdout.trim();
        Ok((!version.is_empty()).then(|| version.to_string()))
    }
}

/// Parse `npm ls --depth=0 --json` output into name/version pairs.
///
/// Entries without a string `version` (missing or unmet dependencies) are
/// left out.
pub fn parse_npm_ls(output: &str, command: &CommandLine) -> Result<InstalledVersions, SourceError> {
    let json: Value = serde_json::from_str(output)
        .map_err(|e| SourceError::invalid_output(command.to_string(), e.to_string()))?;

    let Some(deps) = json.get("dependencies").and_then(|d| d.as_object()) else {
        return Ok(Vec::new());
    };

    Ok(deps
        .iter()
        .filter_map(|(name, info)| {
            let version = info.get("version")?.as_str()?;
            Some((name.clone(), version.to_string()))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::mock::ScriptedRunner;

    fn source(runner: ScriptedRunner) -> (NpmSource, Arc<ScriptedRunner>) {
        let runner = Arc::new(runner);
        let source = NpmSource::new(Path::new("/app"), &Programs::default(), runner.clone());
        (source, runner)
    }

    fn ls_command() -> CommandLine {
        CommandLine::new("npm", ["ls", "--depth=0", "--json"])
    }

    #[test]
    fn test_parse_npm_ls() {
        let output = r#"{
  "name": "app",
  "dependencies": {
    "lodash": { "version": "4.17.20", "resolved": "https://registry.npmjs.org/lodash/-/lodash-4.17.20.tgz" },
    "express": { "version": "4.18.2" },
    "left-pad": { "required": "^1.3.0", "missing": true }
  }
}"#;
        let installed = parse_npm_ls(output, &ls_command()).unwrap();
        assert_eq!(
            installed,
            vec![
                ("lodash".to_string(), "4.17.20".to_string()),
                ("express".to_string(), "4.18.2".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_npm_ls_without_dependencies() {
        let installed = parse_npm_ls(r#"{ "name": "app" }"#, &ls_command()).unwrap();
        assert!(installed.is_empty());
    }

    #[test]
    fn test_parse_npm_ls_invalid_json() {
        let err = parse_npm_ls("npm ERR!", &ls_command()).unwrap_err();
        match err {
            SourceError::InvalidOutput { command, .. } => {
                assert_eq!(command, "npm ls --depth=0 --json")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_installed() {
        let (source, runner) = source(ScriptedRunner::new().reply(
            "npm ls --depth=0 --json",
            r#"{ "dependencies": { "lodash": { "version": "4.17.20" } } }"#,
        ));
        let installed = source.fetch_installed(&["lodash".to_string()]).await.unwrap();
        assert_eq!(installed, vec![("lodash".to_string(), "4.17.20".to_string())]);
        assert_eq!(runner.calls()[0].cwd, Some(PathBuf::from("/app")));
    }

    #[tokio::test]
    async fn test_fetch_installed_non_zero_exit() {
        let (source, _runner) = source(ScriptedRunner::new().fail("npm ls --depth=0 --json", 1));
        let err = source.fetch_installed(&["lodash".to_string()]).await.unwrap_err();
        assert!(matches!(err, SourceError::CommandFailed { code: 1, .. }));
    }

    #[tokio::test]
    async fn test_fetch_latest() {
        let (source, _runner) =
            source(ScriptedRunner::new().reply("npm view lodash version", "4.17.21\n"));
        let latest = source.fetch_latest("lodash").await.unwrap();
        assert_eq!(latest, Some("4.17.21".to_string()));
    }

    #[tokio::test]
    async fn test_fetch_latest_empty_output() {
        let (source, _runner) = source(ScriptedRunner::new().reply("npm view ghost version", "\n"));
        assert_eq!(source.fetch_latest("ghost").await.unwrap(), None);
    }

    #[test]
    fn test_kind() {
        let (source, _runner) = source(ScriptedRunner::new());
        assert_eq!(source.kind(), ProjectKind::Npm);
    }
}
