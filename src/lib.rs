//! uvbump - outdated dependency pin reporter library
//!
//! This library provides the core functionality for comparing declared
//! dependency versions with installed and newest versions for:
//! - uv projects and workspaces (pyproject.toml)
//! - npm projects (package.json)

pub mod cli;
pub mod domain;
pub mod error;
pub mod manifest;
pub mod orchestrator;
pub mod output;
pub mod parser;
pub mod progress;
pub mod reconcile;
pub mod source;
