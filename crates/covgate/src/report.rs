//! Parsing of `go tool cover -func` output
//!
//! Rows look like
//!
//! ```text
//! example.com/app/handler.go:14:    ServeHTTP       85.7%
//! total:                            (statements)    81.2%
//! ```
//!
//! Anything else (for instance the `ok  pkg  coverage: ...` lines of a
//! chained `go test`) is skipped.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Coverage of a single function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCoverage {
    /// `file:line` location of the function
    pub location: String,
    /// Function name
    pub function: String,
    /// Statement coverage, in percent
    pub percent: f64,
}

/// Parsed function report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionReport {
    /// Per-function rows, in report order
    pub functions: Vec<FunctionCoverage>,
    /// Value of the `total:` row, if present
    pub total: Option<f64>,
}

fn function_row() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?P<loc>\S+:\d+):?\s+(?P<func>\S+)\s+(?P<pct>\d+(?:\.\d+)?)%\s*$")
            .expect("function row pattern is valid")
    })
}

fn total_row() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^total:\s+(?:\(\w+\)\s+)?(?P<pct>\d+(?:\.\d+)?)%\s*$")
            .expect("total row pattern is valid")
    })
}

impl FunctionReport {
    /// Parse report text. Never fails; unrecognised lines are ignored.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut report = Self::default();

        for line in text.lines().map(str::trim) {
            if let Some(caps) = total_row().captures(line) {
                report.total = caps["pct"].parse().ok();
            } else if let Some(caps) = function_row().captures(line) {
                if let Ok(percent) = caps["pct"].parse() {
                    report.functions.push(FunctionCoverage {
                        location: caps["loc"].to_string(),
                        function: caps["func"].to_string(),
                        percent,
                    });
                }
            }
        }

        report
    }

    /// The `n` least covered functions, lowest first
    #[must_use]
    pub fn lowest(&self, n: usize) -> Vec<&FunctionCoverage> {
        let mut rows: Vec<&FunctionCoverage> = self.functions.iter().collect();
        rows.sort_by(|a, b| a.percent.total_cmp(&b.percent));
        rows.truncate(n);
        rows
    }

    /// Functions with no coverage at all
    #[must_use]
    pub fn uncovered(&self) -> Vec<&FunctionCoverage> {
        self.functions.iter().filter(|f| f.percent == 0.0).collect()
    }
}

/// Outcome of comparing a total against a threshold
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum ThresholdVerdict {
    /// Total is at or above the threshold
    Meets {
        /// Parsed total
        total: f64,
    },
    /// Total is strictly below the threshold
    Below {
        /// Parsed total
        total: f64,
    },
    /// Report had no total row
    Missing,
}

impl ThresholdVerdict {
    /// Compare `total` against `threshold`; equal passes
    #[must_use]
    pub fn evaluate(total: Option<f64>, threshold: f64) -> Self {
        match total {
            Some(total) if total < threshold => Self::Below { total },
            Some(total) => Self::Meets { total },
            None => Self::Missing,
        }
    }

    /// Whether the gate passes
    #[must_use]
    pub const fn passed(self) -> bool {
        matches!(self, Self::Meets { .. })
    }

    /// Parsed total, if any
    #[must_use]
    pub const fn total(self) -> Option<f64> {
        match self {
            Self::Meets { total } | Self::Below { total } => Some(total),
            Self::Missing => None,
        }
    }
}
