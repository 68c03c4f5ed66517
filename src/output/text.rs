//! Text output formatter for human-readable display
//!
//! Renders up to two fixed-width tables, "Packages out of date:" followed by
//! "Packages can be bumped:", separated by a blank line when both have rows.

use crate::domain::Package;
use crate::orchestrator::RunResult;
use crate::output::{OutputFormatter, UNKNOWN};
use colored::Colorize;
use std::io::Write;

const OUT_OF_DATE_TITLE: &str = "Packages out of date:";
const CAN_BE_BUMPED_TITLE: &str = "Packages can be bumped:";

/// Suggested action for packages with a newer published version
pub const UPDATE_ACTION: &str = "Update package version";

/// Suggested action for packages whose installed version moved ahead of the manifest
pub const BUMP_ACTION: &str = "Bump package version in project specification";

const HEADERS: [&str; 5] = [
    "Package Name",
    "Installed Version",
    "Project Version",
    "Newest Version",
    "Suggested Action",
];

/// Widths of the first four table columns; the action column is unpadded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnWidths {
    pub name: usize,
    pub installed: usize,
    pub declared: usize,
    pub latest: usize,
}

impl Default for ColumnWidths {
    fn default() -> Self {
        Self {
            name: 50,
            installed: 30,
            declared: 30,
            latest: 30,
        }
    }
}

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Whether to use colors
    color: bool,
    /// Column widths
    widths: ColumnWidths,
}

impl TextFormatter {
    /// Create a new text formatter with default column widths
    pub fn new(color: bool) -> Self {
        Self {
            color,
            widths: ColumnWidths::default(),
        }
    }

    /// Set the column widths (builder pattern)
    pub fn with_widths(mut self, widths: ColumnWidths) -> Self {
        self.widths = widths;
        self
    }

    fn row(&self, cells: [&str; 5]) -> String {
        let w = &self.widths;
        format!(
            "{:<w0$}{:<w1$}{:<w2$}{:<w3$}{}",
            cells[0],
            cells[1],
            cells[2],
            cells[3],
            cells[4],
            w0 = w.name,
            w1 = w.installed,
            w2 = w.declared,
            w3 = w.latest,
        )
    }

    fn write_table(
        &self,
        title: &str,
        packages: &[Package],
        action: &str,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        if packages.is_empty() {
            return Ok(());
        }

        if self.color {
            writeln!(writer, "{}", title.bold())?;
            writeln!(writer, "{}", self.row(HEADERS).dimmed())?;
        } else {
            writeln!(writer, "{}", title)?;
            writeln!(writer, "{}", self.row(HEADERS))?;
        }

        for package in packages {
            let line = self.row([
                &package.name,
                package.installed_version.as_deref().unwrap_or(UNKNOWN),
                &package.declared_version,
                package.latest_version.as_deref().unwrap_or(UNKNOWN),
                action,
            ]);
            writeln!(writer, "{}", line)?;
        }
        Ok(())
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, result: &RunResult, writer: &mut dyn Write) -> std::io::Result<()> {
        let report = &result.reconciliation;

        if !report.has_installed {
            let message = format!(
                "No installed versions found for this {} project; nothing to compare.",
                result.kind
            );
            if self.color {
                writeln!(writer, "{}", message.yellow())?;
            } else {
                writeln!(writer, "{}", message)?;
            }
            return Ok(());
        }

        if report.is_empty() {
            let message = "All packages are up to date.";
            if self.color {
                writeln!(writer, "{}", message.green())?;
            } else {
                writeln!(writer, "{}", message)?;
            }
            return Ok(());
        }

        self.write_table(OUT_OF_DATE_TITLE, &report.out_of_date, UPDATE_ACTION, writer)?;
        if !report.out_of_date.is_empty() && !report.can_be_bumped.is_empty() {
            writeln!(writer)?;
        }
        self.write_table(CAN_BE_BUMPED_TITLE, &report.can_be_bumped, BUMP_ACTION, writer)
    }
}
