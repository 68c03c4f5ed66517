//! Version constraint types for dependency listings
//!
//! A lockfile-style listing such as `requests>=2.28.0` is split into a
//! name, a comparison operator and a bare version. The operator is kept so
//! that manifest tooling can write the same constraint back; comparisons
//! only ever look at the bare version.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison operator of a lockfile-style listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VersionOperator {
    #[serde(rename = ">=")]
    GreaterOrEqual,
    #[serde(rename = "<=")]
    LessOrEqual,
    #[serde(rename = "==")]
    Exact,
    #[serde(rename = ">")]
    Greater,
    #[serde(rename = "<")]
    Less,
}

impl VersionOperator {
    /// Operators in matching priority order.
    ///
    /// Two-character operators come first so that `>=` is never read as `>`.
    pub const PRIORITY: [VersionOperator; 5] = [
        VersionOperator::GreaterOrEqual,
        VersionOperator::LessOrEqual,
        VersionOperator::Exact,
        VersionOperator::Greater,
        VersionOperator::Less,
    ];

    /// Returns the operator as written in a listing
    pub fn symbol(&self) -> &'static str {
        match self {
            VersionOperator::GreaterOrEqual => ">=",
            VersionOperator::LessOrEqual => "<=",
            VersionOperator::Exact => "==",
            VersionOperator::Greater => ">",
            VersionOperator::Less => "<",
        }
    }
}

impl fmt::Display for VersionOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A listing split into its parts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedListing {
    /// Package name
    pub name: String,
    /// Constraint operator
    pub operator: VersionOperator,
    /// Bare version
    pub version: String,
}

impl ParsedListing {
    /// Creates a new ParsedListing
    pub fn new(
        name: impl Into<String>,
        operator: VersionOperator,
        version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            operator,
            version: version.into(),
        }
    }
}

impl fmt::Display for ParsedListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.name, self.operator, self.version)
    }
}
