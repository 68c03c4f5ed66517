//! Core domain models for uvbump
//!
//! This module contains the fundamental types used throughout the application:
//! - Project kinds for the supported ecosystems
//! - Version constraint operators and parsed listings
//! - Package records and the ledger that collects them

mod ledger;
mod package;
mod project_kind;
mod version_spec;

pub use ledger::Ledger;
pub use package::Package;
pub use project_kind::ProjectKind;
pub use version_spec::{ParsedListing, VersionOperator};
