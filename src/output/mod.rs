//! Output formatting for reconciliation reports
//!
//! This module provides:
//! - Text output: the two fixed-width tables
//! - JSON output for machine processing

mod json;
mod text;

pub use json::JsonFormatter;
pub use text::{ColumnWidths, TextFormatter};

use crate::orchestrator::RunResult;
use std::io::Write;

/// Placeholder rendered for a version that could not be determined
pub const UNKNOWN: &str = "unknown";

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable tables
    #[default]
    Text,
    /// JSON output for machine processing
    Json,
}

/// Configuration for output formatting
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Output format (text, json)
    pub format: OutputFormat,
    /// Whether to use colors (text only)
    pub color: bool,
    /// Table column widths (text only)
    pub widths: ColumnWidths,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            color: false,
            widths: ColumnWidths::default(),
        }
    }
}

impl OutputConfig {
    /// Create configuration from CLI arguments
    pub fn from_cli(json: bool, color: bool) -> Self {
        let format = if json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        };

        Self {
            format,
            color,
            widths: ColumnWidths::default(),
        }
    }
}

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format and write the report for a finished run
    fn format(&self, result: &RunResult, writer: &mut dyn Write) -> std::io::Result<()>;
}

/// Create an output formatter based on configuration
pub fn create_formatter(config: OutputConfig) -> Box<dyn OutputFormatter> {
    match config.format {
        OutputFormat::Text => Box::new(TextFormatter::new(config.color).with_widths(config.widths)),
        OutputFormat::Json => Box::new(JsonFormatter::new()),
    }
}
