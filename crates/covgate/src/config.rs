//! Gate configuration
//!
//! Values come from defaults, then an optional `covgate.yaml`, then
//! whatever the command line overrides. With no file and no flags the
//! pipeline runs `go` against `./...`, writes `coverage.out` and
//! `coverage.html`, and enforces 80%.

use crate::error::{CovError, CovResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the config file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "covgate.yaml";

/// Default minimum total coverage, in percent
pub const DEFAULT_THRESHOLD: f64 = 80.0;

/// CLI verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    /// Quiet - errors and verdicts only
    Quiet,
    /// Normal - default output
    #[default]
    Normal,
    /// Verbose - extra output
    Verbose,
    /// Debug - maximum output
    Debug,
}

impl Verbosity {
    /// Check if quiet mode
    #[must_use]
    pub const fn is_quiet(self) -> bool {
        matches!(self, Self::Quiet)
    }

    /// Check if verbose or higher
    #[must_use]
    pub const fn is_verbose(self) -> bool {
        matches!(self, Self::Verbose | Self::Debug)
    }

    /// Default `tracing` filter directive for this level
    #[must_use]
    pub const fn log_directive(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "warn",
            Self::Verbose => "info",
            Self::Debug => "debug",
        }
    }
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    /// Always use colors
    Always,
    /// Use colors when output is a terminal
    #[default]
    Auto,
    /// Never use colors
    Never,
}

impl ColorChoice {
    /// Should use colors based on output detection
    #[must_use]
    pub fn should_color(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => std::io::IsTerminal::is_terminal(&std::io::stdout()),
        }
    }
}

/// Coverage gate configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GateConfig {
    /// Go toolchain binary
    pub go_bin: String,
    /// Package pattern passed to `go test`
    pub packages: String,
    /// Coverage profile path
    pub profile: String,
    /// HTML report path
    pub html: String,
    /// Minimum total coverage, in percent
    pub threshold: f64,
    /// Working directory for child commands (inherited when unset)
    pub workdir: Option<PathBuf>,
    /// Verbosity level
    pub verbosity: Verbosity,
    /// Color output choice
    pub color: ColorChoice,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            go_bin: "go".to_string(),
            packages: "./...".to_string(),
            profile: "coverage.out".to_string(),
            html: "coverage.html".to_string(),
            threshold: DEFAULT_THRESHOLD,
            workdir: None,
            verbosity: Verbosity::Normal,
            color: ColorChoice::Auto,
        }
    }
}

impl GateConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a YAML document. Missing keys keep their defaults.
    pub fn from_yaml_str(yaml: &str) -> CovResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> CovResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| CovError::ConfigFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Path of `covgate.yaml` in `dir`, if there is one
    #[must_use]
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        Some(dir.join(CONFIG_FILE_NAME)).filter(|candidate| candidate.is_file())
    }

    /// Check that values are usable
    pub fn validate(&self) -> CovResult<()> {
        if !self.threshold.is_finite() || !(0.0..=100.0).contains(&self.threshold) {
            return Err(CovError::config(format!(
                "threshold must be between 0 and 100, got {}",
                self.threshold
            )));
        }
        if self.go_bin.trim().is_empty() {
            return Err(CovError::config("go binary must not be empty"));
        }
        if self.packages.trim().is_empty() {
            return Err(CovError::config("package pattern must not be empty"));
        }
        if self.profile.trim().is_empty() {
            return Err(CovError::config("profile path must not be empty"));
        }
        if self.html.trim().is_empty() {
            return Err(CovError::config("html path must not be empty"));
        }
        Ok(())
    }

    /// Set verbosity
    #[must_use]
    pub const fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set color choice
    #[must_use]
    pub const fn with_color(mut self, color: ColorChoice) -> Self {
        self.color = color;
        self
    }

    /// Set threshold
    #[must_use]
    pub const fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set go binary
    #[must_use]
    pub fn with_go_bin(mut self, go_bin: impl Into<String>) -> Self {
        self.go_bin = go_bin.into();
        self
    }

    /// Set package pattern
    #[must_use]
    pub fn with_packages(mut self, packages: impl Into<String>) -> Self {
        self.packages = packages.into();
        self
    }

    /// Set profile path
    #[must_use]
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    /// Set HTML report path
    #[must_use]
    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = html.into();
        self
    }

    /// Set working directory
    #[must_use]
    pub fn with_workdir(mut self, workdir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(workdir.into());
        self
    }
}

/// Format a percentage the way it is printed in messages: `80.0`, `82.5`, `82.25`
#[must_use]
pub fn format_percent(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}
