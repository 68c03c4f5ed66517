//! Lockfile-style (uv/pip) dependency listing parser
//!
//! Handles listings such as:
//! - `requests>=2.28.0`
//! - `pydantic==2.0.0`
//! - `httpx>=0.24,<1.0` (only the first constraint is honored)

use crate::domain::{ParsedListing, VersionOperator};
use crate::error::SpecError;

/// Split a listing into name, operator and version.
///
/// Only the text before the first comma is considered. Operators are tried
/// in [`VersionOperator::PRIORITY`] order and the listing is split at the
/// first occurrence of the first one present.
pub fn parse_listing(listing: &str) -> Result<ParsedListing, SpecError> {
    let constraint = listing.split(',').next().unwrap_or(listing);

    for operator in VersionOperator::PRIORITY {
        if let Some((name, version)) = constraint.split_once(operator.symbol()) {
            return Ok(ParsedListing::new(name.trim(), operator, version.trim()));
        }
    }

    Err(SpecError::unknown_scheme(listing))
}

/// Returns true if a package name carries extras (`name[extra]`)
pub fn has_extras(name: &str) -> bool {
    name.contains('[')
}
