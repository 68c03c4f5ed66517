//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ManifestError: Issues locating or parsing a manifest file
//! - SpecError: Dependency listings the tool cannot version-compare
//! - SourceError: Failures of external version queries (never fatal)
//! - IoError: Report output failures

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Exit code for a missing manifest
pub const EXIT_MANIFEST_NOT_FOUND: u8 = 2;

/// Exit code for an unsupported dependency specification
pub const EXIT_UNSUPPORTED_SPEC: u8 = 3;

/// Exit code for every other fatal error
pub const EXIT_FAILURE: u8 = 1;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Manifest file related errors
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Dependency specification errors
    #[error(transparent)]
    Spec(#[from] SpecError),

    /// IO related errors
    #[error(transparent)]
    Io(#[from] IoError),
}

impl AppError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Manifest(ManifestError::NotFound { .. }) => EXIT_MANIFEST_NOT_FOUND,
            AppError::Spec(SpecError::Unsupported { .. }) => EXIT_UNSUPPORTED_SPEC,
            _ => EXIT_FAILURE,
        }
    }
}

/// Errors related to manifest file operations
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Manifest file not found
    #[error("manifest file not found: {path}")]
    NotFound { path: PathBuf },

    /// Failed to read manifest file
    #[error("failed to read manifest file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing error (for package.json)
    #[error("failed to parse JSON in {path}: {message}")]
    JsonParseError { path: PathBuf, message: String },

    /// TOML parsing error (for pyproject.toml)
    #[error("failed to parse TOML in {path}: {message}")]
    TomlParseError { path: PathBuf, message: String },
}

/// Errors raised while turning listings into packages
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SpecError {
    /// No recognized comparison operator in a listing
    #[error("unknown package versioning scheme for package listing: {listing}")]
    UnknownVersionScheme { listing: String },

    /// A dependency that cannot be version-compared
    #[error("unsupported dependency specification for {name}: {spec} ({reason})")]
    Unsupported {
        name: String,
        spec: String,
        reason: String,
    },
}

/// Errors from external version queries
#[derive(Error, Debug)]
pub enum SourceError {
    /// The program could not be found on PATH
    #[error("program '{program}' not found")]
    ProgramNotFound { program: String },

    /// The program could not be started for another reason
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The command did not finish in time
    #[error("`{command}` timed out after {}s", .timeout.as_secs())]
    Timeout { command: String, timeout: Duration },

    /// The command exited with a non-zero status
    #[error("`{command}` exited with status {code}: {stderr}")]
    CommandFailed {
        command: String,
        code: i32,
        stderr: String,
    },

    /// The command output could not be interpreted
    #[error("unexpected output from `{command}`: {message}")]
    InvalidOutput { command: String, message: String },
}

/// Errors related to IO operations
#[derive(Error, Debug)]
pub enum IoError {
    /// Writing the report failed
    #[error("failed to write report: {source}")]
    Report {
        #[source]
        source: std::io::Error,
    },
}

impl ManifestError {
    /// Creates a new NotFound error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        ManifestError::NotFound { path: path.into() }
    }

    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new JsonParseError
    pub fn json_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ManifestError::JsonParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new TomlParseError
    pub fn toml_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ManifestError::TomlParseError {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl SpecError {
    /// Creates a new UnknownVersionScheme error
    pub fn unknown_scheme(listing: impl Into<String>) -> Self {
        SpecError::UnknownVersionScheme {
            listing: listing.into(),
        }
    }

    /// Creates a new Unsupported error
    pub fn unsupported(
        name: impl Into<String>,
        spec: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        SpecError::Unsupported {
            name: name.into(),
            spec: spec.into(),
            reason: reason.into(),
        }
    }
}

impl SourceError {
    /// Creates a new Timeout error
    pub fn timeout(command: impl Into<String>, timeout: Duration) -> Self {
        SourceError::Timeout {
            command: command.into(),
            timeout,
        }
    }

    /// Creates a new InvalidOutput error
    pub fn invalid_output(command: impl Into<String>, message: impl Into<String>) -> Self {
        SourceError::InvalidOutput {
            command: command.into(),
            message: message.into(),
        }
    }
}
