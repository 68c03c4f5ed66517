//! JSON output formatter for machine processing

use crate::domain::{Package, ProjectKind};
use crate::orchestrator::RunResult;
use crate::output::OutputFormatter;
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
#[derive(Debug, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new() -> Self {
        Self
    }
}

/// JSON representation of the full report
#[derive(Serialize)]
struct JsonOutput<'a> {
    /// Project kind
    kind: ProjectKind,
    /// Packages with a newer published version
    out_of_date: &'a [Package],
    /// Packages whose installed version differs from the manifest
    can_be_bumped: &'a [Package],
    /// Whether any installed version was found
    installed_known: bool,
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, result: &RunResult, writer: &mut dyn Write) -> std::io::Result<()> {
        let report = &result.reconciliation;
        let output = JsonOutput {
            kind: result.kind,
            out_of_date: &report.out_of_date,
            can_be_bumped: &report.can_be_bumped,
            installed_known: report.has_installed,
        };

        serde_json::to_writer_pretty(&mut *writer, &output)?;
        writeln!(writer)
    }
}
