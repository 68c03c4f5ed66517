//! Package information structures

use super::{ParsedListing, VersionOperator};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A dependency together with every version known about it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    /// Package name
    pub name: String,
    /// Version as declared in the manifest, without its operator
    pub declared_version: String,
    /// Constraint operator of a lockfile-style listing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<VersionOperator>,
    /// Version present in the local environment
    pub installed_version: Option<String>,
    /// Newest version published to the registry
    pub latest_version: Option<String>,
}

impl Package {
    /// Creates a new package with no known installed or latest version
    pub fn new(name: impl Into<String>, declared_version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_version: declared_version.into(),
            operator: None,
            installed_version: None,
            latest_version: None,
        }
    }

    /// Sets the constraint operator (builder pattern)
    pub fn with_operator(mut self, operator: VersionOperator) -> Self {
        self.operator = Some(operator);
        self
    }

    /// Sets the installed version (builder pattern)
    pub fn with_installed(mut self, version: impl Into<String>) -> Self {
        self.installed_version = Some(version.into());
        self
    }

    /// Sets the latest version (builder pattern)
    pub fn with_latest(mut self, version: impl Into<String>) -> Self {
        self.latest_version = Some(version.into());
        self
    }

    /// Returns true if the installed version differs from the declared one
    pub fn installed_differs(&self) -> bool {
        self.installed_version
            .as_deref()
            .is_some_and(|v| v != self.declared_version)
    }

    /// Returns true if the latest version differs from the declared one.
    ///
    /// When `require_latest` is set an unknown latest version never differs.
    pub fn latest_differs(&self, require_latest: bool) -> bool {
        match self.latest_version.as_deref() {
            Some(latest) => latest != self.declared_version,
            None => !require_latest,
        }
    }
}

impl From<ParsedListing> for Package {
    fn from(listing: ParsedListing) -> Self {
        Package::new(listing.name, listing.version).with_operator(listing.operator)
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operator {
            Some(op) => write!(f, "{}{}{}", self.name, op, self.declared_version),
            None => write!(f, "{}@{}", self.name, self.declared_version),
        }
    }
}
