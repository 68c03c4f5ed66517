//! Progress display for version queries
//!
//! A spinner covers the bulk installed-version query, a bar counts the
//! per-package latest-version queries. Everything draws to stderr so the
//! report on stdout stays clean.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const SPINNER_TEMPLATE: &str = "{spinner:.cyan} {msg}";
const BAR_TEMPLATE: &str = "{spinner:.cyan} {msg} [{bar:30.cyan/blue}] {pos}/{len}";

/// Progress reporter for a run
pub struct Progress {
    /// Disabled in quiet mode and when stderr is not a terminal
    enabled: bool,
    bar: Option<ProgressBar>,
}

impl Progress {
    /// Create a new progress reporter
    pub fn new(enabled: bool) -> Self {
        Self { enabled, bar: None }
    }

    /// Create a disabled progress reporter
    pub fn disabled() -> Self {
        Self::new(false)
    }

    /// Show a spinner while installed versions are queried
    pub fn installed_query(&mut self, tool: &str) {
        if !self.enabled {
            return;
        }
        self.clear();

        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template(SPINNER_TEMPLATE) {
            spinner.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
        }
        spinner.set_message(format!("Querying installed {} packages...", tool));
        spinner.enable_steady_tick(Duration::from_millis(80));
        self.bar = Some(spinner);
    }

    /// Start counting latest-version queries
    pub fn latest_queries(&mut self, total: usize) {
        if !self.enabled {
            return;
        }
        self.clear();

        let bar = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::with_template(BAR_TEMPLATE) {
            bar.set_style(style.progress_chars("█▓▒░"));
        }
        bar.set_message("Checking latest versions");
        bar.enable_steady_tick(Duration::from_millis(100));
        self.bar = Some(bar);
    }

    /// Record one finished query
    pub fn finished(&self, package: &str) {
        if let Some(ref bar) = self.bar {
            bar.set_message(format!("Checked {}", package));
            bar.inc(1);
        }
    }

    /// Remove whatever is currently drawn
    pub fn clear(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

impl Drop for Progress {
    fn drop(&mut self) {
        self.clear();
    }
}
