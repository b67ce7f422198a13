//! Output formatting and progress reporting

use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::time::Duration;

/// Output format for the final pipeline report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text only
    #[default]
    Text,
    /// Text followed by a JSON report
    Json,
}

/// Prints step progress, captured command output and verdicts to stdout
#[derive(Debug)]
pub struct ProgressReporter {
    term: Term,
    spinner: Option<ProgressBar>,
    transcript: Option<RefCell<Vec<String>>>,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(false, false)
    }
}

impl ProgressReporter {
    /// Create a new progress reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stdout(),
            spinner: None,
            transcript: None,
            use_color,
            quiet,
        }
    }

    /// Also record every printed line (uncolored), for inspection in tests
    #[must_use]
    pub fn with_transcript(mut self) -> Self {
        self.transcript = Some(RefCell::new(Vec::new()));
        self
    }

    /// Lines printed so far, if recording
    #[must_use]
    pub fn transcript(&self) -> Vec<String> {
        self.transcript
            .as_ref()
            .map(|t| t.borrow().clone())
            .unwrap_or_default()
    }

    fn emit(&self, plain: &str, styled: Option<String>) {
        if let Some(ref transcript) = self.transcript {
            transcript.borrow_mut().push(plain.to_string());
        }
        let line = match styled {
            Some(styled) if self.use_color => styled,
            _ => plain.to_string(),
        };
        let _ = self.term.write_line(&line);
    }

    /// Show a spinner on stderr while a command runs
    pub fn start_spinner(&mut self, message: &str) {
        if self.quiet || !console::user_attended_stderr() {
            return;
        }

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg} [{elapsed}]")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        self.spinner = Some(spinner);
    }

    /// Clear the spinner, if any
    pub fn finish_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    /// Print a step's progress message
    pub fn progress(&self, message: &str) {
        if self.quiet {
            return;
        }
        self.emit(message, Some(style(message).bold().to_string()));
    }

    /// Echo captured command output
    pub fn output(&self, text: &str) {
        if self.quiet {
            return;
        }
        let text = text.trim_end_matches(['\n', '\r']);
        if text.is_empty() {
            return;
        }
        self.emit(text, None);
    }

    /// Print `Error: <text>`, even in quiet mode
    pub fn error(&self, text: &str) {
        let text = text.trim_end_matches(['\n', '\r']);
        let plain = format!("Error: {text}");
        let styled = format!("{} {text}", style("Error:").red().bold());
        self.emit(&plain, Some(styled));
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }
        self.emit(message, Some(style(message).green().to_string()));
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.quiet {
            return;
        }
        self.emit(message, Some(style(message).yellow().to_string()));
    }

    /// Print the threshold verdict; never suppressed
    pub fn verdict(&self, message: &str, passed: bool) {
        let styled = if passed {
            style(message).green().bold().to_string()
        } else {
            style(message).red().bold().to_string()
        };
        self.emit(message, Some(styled));
    }

    /// Print a closing summary line
    pub fn summary(&self, steps_run: usize, exit_code: i32, duration: Duration) {
        if self.quiet {
            return;
        }
        let status = if exit_code == 0 { "PASSED" } else { "FAILED" };
        let plain = format!(
            "{status} {steps_run} steps in {:.2}s (exit code {exit_code})",
            duration.as_secs_f64()
        );
        let styled = if exit_code == 0 {
            style(&plain).green().to_string()
        } else {
            style(&plain).red().to_string()
        };
        self.emit(&plain, Some(styled));
    }
}
