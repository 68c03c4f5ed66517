//! Manifest reading for the supported project kinds
//!
//! This module provides functionality to:
//! - Locate the manifest of a project rooted at a directory
//! - Collect raw dependency listings from every dependency-bearing section
//! - Follow uv workspace members
//! - Turn listings into [`Package`] records

mod package_json;
mod pyproject_toml;

pub use package_json::NpmProject;
pub use pyproject_toml::UvProject;

use crate::domain::{Package, ProjectKind};
use crate::error::AppError;
use crate::error::ManifestError;
use std::path::{Path, PathBuf};

/// A project whose manifest can be turned into packages
pub trait Project {
    /// Returns the kind of this project
    fn kind(&self) -> ProjectKind;

    /// Path of the root manifest
    fn manifest_path(&self) -> PathBuf;

    /// Read the manifest(s) and return one package per dependency
    fn packages(&self) -> Result<Vec<Package>, AppError>;
}

/// Get a project reader for the specified kind rooted at `root`
pub fn open_project(kind: ProjectKind, root: &Path) -> Box<dyn Project> {
    match kind {
        ProjectKind::Uv => Box::new(UvProject::new(root)),
        ProjectKind::Npm => Box::new(NpmProject::new(root)),
    }
}

/// Read a manifest file, reporting a missing file as [`ManifestError::NotFound`]
pub fn read_manifest(path: &Path) -> Result<String, ManifestError> {
    if !path.is_file() {
        return Err(ManifestError::not_found(path));
    }
    std::fs::read_to_string(path).map_err(|e| ManifestError::read_error(path, e))
}
