//! UI/Progress presentation layer
//!
//! All user facing progress of the module client goes through the
//! [`Reporter`] trait, so `kcl mod -q` can swap in a silent implementation:
//! - [`TerminalReporter`] prints to stderr and shows a spinner while fetching
//! - [`QuietReporter`] drops everything

pub mod prompt;

use std::time::Duration;

use console::{Style, Term};
use indicatif::{ProgressBar, ProgressStyle};

/// Progress reporting for module client operations
pub trait Reporter: Send + Sync {
    /// Report a progress message
    fn report(&self, message: &str);

    /// Report a non-fatal problem
    fn warn(&self, message: &str);

    /// Start a spinner for a long running fetch
    fn fetching(&self, what: &str) -> Spinner;
}

/// Spinner handle; cleared when finished or dropped
pub struct Spinner(Option<ProgressBar>);

impl Spinner {
    pub fn hidden() -> Self {
        Self(None)
    }

    pub fn finish(mut self) {
        if let Some(pb) = self.0.take() {
            pb.finish_and_clear();
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if let Some(pb) = self.0.take() {
            pb.finish_and_clear();
        }
    }
}

/// Reporter writing to stderr
#[derive(Debug, Default)]
pub struct TerminalReporter;

impl Reporter for TerminalReporter {
    fn report(&self, message: &str) {
        eprintln!("{message}");
    }

    fn warn(&self, message: &str) {
        eprintln!("{} {}", Style::new().yellow().bold().apply_to("warning:"), message);
    }

    fn fetching(&self, what: &str) -> Spinner {
        if !Term::stderr().is_term() {
            eprintln!("fetching '{what}'");
            return Spinner::hidden();
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner} Fetching {msg}") {
            pb.set_style(style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]));
        }
        pb.set_message(what.to_string());
        pb.enable_steady_tick(Duration::from_millis(80));
        Spinner(Some(pb))
    }
}

/// Reporter for `--quiet`
#[derive(Debug, Default)]
pub struct QuietReporter;

impl Reporter for QuietReporter {
    fn report(&self, _message: &str) {}

    fn warn(&self, _message: &str) {}

    fn fetching(&self, _what: &str) -> Spinner {
        Spinner::hidden()
    }
}

/// Pick the reporter for the `--quiet` flag
pub fn reporter(quiet: bool) -> Box<dyn Reporter> {
    if quiet {
        Box::new(QuietReporter)
    } else {
        Box::new(TerminalReporter)
    }
}
