//! Dependency listing parsers for the supported ecosystems
//!
//! This module provides:
//! - Lockfile-style listing splitting (`name>=1.2.3`) for uv projects
//! - Range marker normalization (`^1.2.3`) for npm projects

mod node;
mod python;

pub use node::{is_non_registry, normalize};
pub use python::{has_extras, parse_listing};
