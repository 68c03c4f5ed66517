//! package.json reader for npm projects
//!
//! Handles:
//! - dependencies
//! - devDependencies
//! - peerDependencies
//! - optionalDependencies

use crate::domain::{Package, ProjectKind};
use crate::error::{AppError, ManifestError, SpecError};
use crate::manifest::{read_manifest, Project};
use crate::parser::{is_non_registry, normalize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;

/// Dependency sections, merged in this order (later sections win)
const DEPENDENCY_SECTIONS: [&str; 4] = [
    "dependencies",
    "devDependencies",
    "peerDependencies",
    "optionalDependencies",
];

/// An npm project
#[derive(Debug, Clone)]
pub struct NpmProject {
    root: PathBuf,
}

impl NpmProject {
    /// Create an npm project rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Return the merged name → spec mapping of all dependency sections.
    ///
    /// A name declared in several sections keeps its first position and
    /// takes the spec of the last section declaring it.
    pub fn dependency_specs(&self) -> Result<Vec<(String, String)>, ManifestError> {
        let path = self.manifest_path();
        let content = read_manifest(&path)?;
        let json: Value = serde_json::from_str(&content)
            .map_err(|e| ManifestError::json_parse_error(&path, e.to_string()))?;

        let mut specs: Vec<(String, String)> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for section in DEPENDENCY_SECTIONS {
            let Some(deps) = json.get(section).and_then(|v| v.as_object()) else {
                continue;
            };
            for (name, value) in deps {
                let Some(spec) = value.as_str() else {
                    tracing::debug!(package = %name, section, "skipping non-string spec");
                    continue;
                };
                match positions.get(name) {
                    Some(&i) => specs[i].1 = spec.to_string(),
                    None => {
                        positions.insert(name.clone(), specs.len());
                        specs.push((name.clone(), spec.to_string()));
                    }
                }
            }
        }

        Ok(specs)
    }
}

impl Project for NpmProject {
    fn kind(&self) -> ProjectKind {
        ProjectKind::Npm
    }

    fn manifest_path(&self) -> PathBuf {
        self.root.join(ProjectKind::Npm.manifest_filename())
    }

    fn packages(&self) -> Result<Vec<Package>, AppError> {
        let specs = self.dependency_specs()?;

        if let Some((name, spec)) = specs.iter().find(|(_, spec)| is_non_registry(spec)) {
            return Err(SpecError::unsupported(
                name.clone(),
                spec.clone(),
                "non-registry specs cannot be version-compared",
            )
            .into());
        }

        Ok(specs
            .into_iter()
            .map(|(name, spec)| Package::new(name, normalize(&spec)))
            .collect())
    }
}
