//! Project kind definitions for the supported package ecosystems

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported project kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProjectKind {
    /// uv-managed Python project (pyproject.toml, optionally a workspace)
    #[default]
    Uv,
    /// npm project (package.json)
    Npm,
}

impl ProjectKind {
    /// Returns the manifest filename for this kind
    pub fn manifest_filename(&self) -> &'static str {
        match self {
            ProjectKind::Uv => "pyproject.toml",
            ProjectKind::Npm => "package.json",
        }
    }

    /// Returns the display name for this kind
    pub fn display_name(&self) -> &'static str {
        match self {
            ProjectKind::Uv => "uv",
            ProjectKind::Npm => "npm",
        }
    }
}

impl fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
