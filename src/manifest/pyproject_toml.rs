//! pyproject.toml reader for uv projects
//!
//! Handles:
//! - project.dependencies (PEP 621)
//! - project.dependency-groups
//! - dependency-groups (PEP 735)
//! - tool.uv.workspace.members, each read the same way

use crate::domain::{Package, ProjectKind};
use crate::error::{AppError, ManifestError, SpecError};
use crate::manifest::{read_manifest, Project};
use crate::parser::{has_extras, parse_listing};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use toml::{Table, Value};

/// A uv-managed project, workspace aware
#[derive(Debug, Clone)]
pub struct UvProject {
    root: PathBuf,
}

impl UvProject {
    /// Create a uv project rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Collect dependency listings from the root manifest and every
    /// workspace member that has a manifest, deduplicated in first-seen order
    pub fn dependency_listings(&self) -> Result<Vec<String>, ManifestError> {
        let root_path = self.manifest_path();
        let root_data = load_toml(&root_path)?;
        let mut listings = collect_dependency_listings(&root_data);

        for member in workspace_members(&root_data) {
            let member_path = self
                .root
                .join(member)
                .join(ProjectKind::Uv.manifest_filename());
            if !member_path.is_file() {
                tracing::debug!(member, "workspace member has no pyproject.toml, skipping");
                continue;
            }
            let member_data = load_toml(&member_path)?;
            listings.extend(collect_dependency_listings(&member_data));
        }

        Ok(dedup_preserving_order(listings))
    }
}

impl Project for UvProject {
    fn kind(&self) -> ProjectKind {
        ProjectKind::Uv
    }

    fn manifest_path(&self) -> PathBuf {
        self.root.join(ProjectKind::Uv.manifest_filename())
    }

    fn packages(&self) -> Result<Vec<Package>, AppError> {
        let parsed = self
            .dependency_listings()?
            .iter()
            .map(|listing| parse_listing(listing))
            .collect::<Result<Vec<_>, _>>()?;

        let extras: Vec<_> = parsed.iter().filter(|p| has_extras(&p.name)).collect();
        for listing in &extras {
            tracing::error!(package = %listing.name, "unsupported package with extras");
        }
        if let Some(first) = extras.first() {
            return Err(SpecError::unsupported(
                first.name.clone(),
                first.to_string(),
                "package extras are not supported",
            )
            .into());
        }

        Ok(parsed.into_iter().map(Package::from).collect())
    }
}

fn load_toml(path: &Path) -> Result<Table, ManifestError> {
    let content = read_manifest(path)?;
    toml::from_str(&content).map_err(|e| ManifestError::toml_parse_error(path, e.to_string()))
}

/// Collect dependency listings from a parsed pyproject.toml.
///
/// Reads `project.dependencies`, every group under
/// `project.dependency-groups` and every group under the top-level
/// `dependency-groups`, in that order. Groups keep their declaration order.
fn collect_dependency_listings(data: &Table) -> Vec<String> {
    let mut listings = Vec::new();
    let project = data.get("project");

    if let Some(deps) = project
        .and_then(|p| p.get("dependencies"))
        .and_then(|d| d.as_array())
    {
        push_string_entries(deps, &mut listings);
    }

    let groups = [
        project.and_then(|p| p.get("dependency-groups")),
        data.get("dependency-groups"),
    ];
    for table in groups.into_iter().flatten().filter_map(|g| g.as_table()) {
        for deps in table.values().filter_map(|d| d.as_array()) {
            push_string_entries(deps, &mut listings);
        }
    }

    listings
}

fn push_string_entries(entries: &[Value], listings: &mut Vec<String>) {
    for entry in entries {
        match entry.as_str() {
            Some(listing) => listings.push(listing.to_string()),
            None => tracing::debug!(?entry, "skipping non-string dependency entry"),
        }
    }
}

fn workspace_members(data: &Table) -> Vec<&str> {
    data.get("tool")
        .and_then(|t| t.get("uv"))
        .and_then(|u| u.get("workspace"))
        .and_then(|w| w.get("members"))
        .and_then(|m| m.as_array())
        .map(|members| members.iter().filter_map(|m| m.as_str()).collect())
        .unwrap_or_default()
}

fn dedup_preserving_order(listings: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    listings
        .into_iter()
        .filter(|listing| seen.insert(listing.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::VersionOperator;
    use std::fs;
    use tempfile::TempDir;

    fn write_pyproject(dir: &Path, content: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join("pyproject.toml"), content).unwrap();
    }

    fn project_with(content: &str) -> (TempDir, UvProject) {
        let temp_dir = tempfile::tempdir().unwrap();
        write_pyproject(temp_dir.path(), content);
        let project = UvProject::new(temp_dir.path());
        (temp_dir, project)
    }

    #[test]
    fn test_collect_all_three_sources_in_order() {
        let data: Table = toml::from_str(
            r#"
dependency-groups = { lint = ["ruff>=0.5"] }

[project]
dependencies = ["requests>=2.28.0"]

[project.dependency-groups]
test = ["pytest>=7.0.0"]
"#,
        )
        .unwrap();

        let listings = collect_dependency_listings(&data);
        assert_eq!(
            listings,
            vec!["requests>=2.28.0", "pytest>=7.0.0", "ruff>=0.5"]
        );
    }

    #[test]
    fn test_collect_skips_non_string_entries() {
        let data: Table = toml::from_str(
            r#"
[dependency-groups]
dev = ["pytest>=8", { include-group = "lint" }]
lint = ["ruff>=0.5"]
"#,
        )
        .unwrap();

        let listings = collect_dependency_listings(&data);
        assert_eq!(listings, vec!["pytest>=8", "ruff>=0.5"]);
    }

    #[test]
    fn test_collect_groups_in_declaration_order() {
        let data: Table = toml::from_str(
            r#"
[dependency-groups]
test = ["pytest>=8", "shared>=2"]
dev = ["shared>=1", "ruff>=0.5"]
"#,
        )
        .unwrap();

        let listings = collect_dependency_listings(&data);
        assert_eq!(listings, vec!["pytest>=8", "shared>=2", "shared>=1", "ruff>=0.5"]);
    }

    #[test]
    fn test_first_declared_group_wins_duplicate_name() {
        let (_dir, project) = project_with(
            r#"
[dependency-groups]
test = ["shared>=2"]
dev = ["shared>=1"]
"#,
        );

        let ledger = crate::domain::Ledger::from_packages(project.packages().unwrap());
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.get("shared").unwrap().declared_version, "2");
    }

    #[test]
    fn test_collect_empty() {
        let data: Table = toml::from_str("[project]\nname = \"x\"\n").unwrap();
        assert!(collect_dependency_listings(&data).is_empty());
    }

    #[test]
    fn test_dedup_first_occurrence_wins() {
        let listings = vec!["a>=1".to_string(), "b>=2".to_string(), "a>=1".to_string()];
        assert_eq!(dedup_preserving_order(listings), vec!["a>=1", "b>=2"]);
    }

    #[test]
    fn test_dedup_is_verbatim() {
        let listings = vec!["a>=1".to_string(), "a >= 1".to_string()];
        assert_eq!(dedup_preserving_order(listings).len(), 2);
    }

    #[test]
    fn test_missing_manifest() {
        let temp_dir = tempfile::tempdir().unwrap();
        let project = UvProject::new(temp_dir.path());
        let err = project.dependency_listings().unwrap_err();
        assert!(matches!(err, ManifestError::NotFound { .. }));

        let err = project.packages().unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_MANIFEST_NOT_FOUND);
    }

    #[test]
    fn test_invalid_toml() {
        let (_dir, project) = project_with("not valid toml [");
        let err = project.dependency_listings().unwrap_err();
        assert!(matches!(err, ManifestError::TomlParseError { .. }));
    }

    #[test]
    fn test_workspace_members_merged() {
        let (dir, project) = project_with(
            r#"
[project]
dependencies = ["requests>=2.28.0"]

[tool.uv.workspace]
members = ["packages/core", "packages/missing"]
"#,
        );
        write_pyproject(
            &dir.path().join("packages/core"),
            r#"
[project]
dependencies = ["pydantic==2.0.0", "requests>=2.28.0"]
"#,
        );

        let listings = project.dependency_listings().unwrap();
        assert_eq!(listings, vec!["requests>=2.28.0", "pydantic==2.0.0"]);
    }

    #[test]
    fn test_packages() {
        let (_dir, project) = project_with(
            r#"
[project]
dependencies = ["requests>=2.28.0,<3", "pydantic==2.0.0"]
"#,
        );

        let packages = project.packages().unwrap();
        assert_eq!(packages.len(), 2);
        assert_eq!(packages[0].name, "requests");
        assert_eq!(packages[0].declared_version, "2.28.0");
        assert_eq!(packages[0].operator, Some(VersionOperator::GreaterOrEqual));
        assert_eq!(packages[1].name, "pydantic");
        assert_eq!(packages[1].operator, Some(VersionOperator::Exact));
    }

    #[test]
    fn test_packages_unconstrained_listing_fails() {
        let (_dir, project) = project_with(
            r#"
[project]
dependencies = ["requests"]
"#,
        );

        let err = project.packages().unwrap_err();
        assert!(matches!(
            err,
            AppError::Spec(SpecError::UnknownVersionScheme { .. })
        ));
    }

    #[test]
    fn test_packages_extras_unsupported() {
        let (_dir, project) = project_with(
            r#"
[project]
dependencies = ["requests>=2.28.0", "httpx[http2]>=0.24.0"]
"#,
        );

        let err = project.packages().unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_UNSUPPORTED_SPEC);
        assert!(err.to_string().contains("httpx[http2]"));
    }

    #[test]
    fn test_kind() {
        assert_eq!(UvProject::new("/repo").kind(), ProjectKind::Uv);
    }
}
