//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use covgate::{ColorChoice, CovResult, GateConfig, OutputFormat, Verbosity};
use std::path::{Path, PathBuf};

/// covgate: run Go test coverage and enforce a minimum total
#[derive(Parser, Debug)]
#[command(name = "covgate")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (errors and the coverage verdict only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, global = true)]
    pub color: Option<ColorArg>,

    /// Config file (defaults to covgate.yaml in the working directory, if present)
    #[arg(long, global = true, env = "COVGATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Minimum total coverage in percent
    #[arg(short, long, global = true)]
    pub threshold: Option<f64>,

    /// Coverage profile path
    #[arg(long, global = true)]
    pub profile: Option<String>,

    /// HTML report path
    #[arg(long, global = true)]
    pub html: Option<String>,

    /// Package pattern passed to go test
    #[arg(long, global = true)]
    pub packages: Option<String>,

    /// Go toolchain binary
    #[arg(long = "go", global = true)]
    pub go_bin: Option<String>,

    /// Run in this directory
    #[arg(short = 'C', long, global = true)]
    pub workdir: Option<PathBuf>,

    /// Report format printed after the run
    #[arg(long, default_value = "text", global = true)]
    pub format: FormatArg,

    /// Emit diagnostic logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Subcommand to run (defaults to `run`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// CLI subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run the full pipeline: tests, profile, function report, HTML report, threshold check
    Run,

    /// Only run the threshold check
    Check,

    /// Show the effective configuration
    Config(ConfigArgs),
}

/// Arguments for the config command
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
pub struct ConfigArgs {
    /// Print as JSON
    #[arg(long, conflicts_with = "yaml")]
    pub json: bool,

    /// Print as YAML, suitable for covgate.yaml
    #[arg(long)]
    pub yaml: bool,
}

/// Color argument for CLI
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

/// Format argument for CLI
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormatArg {
    /// Human-readable text
    #[default]
    Text,
    /// Text, then the run report as JSON
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => Self::Text,
            FormatArg::Json => Self::Json,
        }
    }
}

impl Cli {
    /// Subcommand to run, `run` when none was given
    #[must_use]
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Run)
    }

    /// Directory the pipeline runs in
    #[must_use]
    pub fn base_dir(&self) -> PathBuf {
        self.workdir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Config file to read: `--config`, else `covgate.yaml` in the base dir
    #[must_use]
    pub fn config_file(&self) -> Option<PathBuf> {
        match self.config {
            Some(ref path) => Some(self.resolve(path)),
            None => GateConfig::discover(&self.base_dir()),
        }
    }

    /// Effective configuration: defaults, then config file, then flags
    pub fn gate_config(&self) -> CovResult<GateConfig> {
        let base = match self.config_file() {
            Some(path) => GateConfig::load(&path)?,
            None => GateConfig::default(),
        };
        let config = self.apply_overrides(base);
        config.validate()?;
        Ok(config)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() || self.workdir.is_none() {
            path.to_path_buf()
        } else {
            self.base_dir().join(path)
        }
    }

    /// Apply command-line flags on top of `config`
    #[must_use]
    pub fn apply_overrides(&self, mut config: GateConfig) -> GateConfig {
        if self.quiet {
            config.verbosity = Verbosity::Quiet;
        } else if self.verbose > 0 {
            config.verbosity = match self.verbose {
                1 => Verbosity::Verbose,
                _ => Verbosity::Debug,
            };
        }
        if let Some(color) = self.color {
            config.color = color.into();
        }
        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }
        if let Some(ref profile) = self.profile {
            config.profile.clone_from(profile);
        }
        if let Some(ref html) = self.html {
            config.html.clone_from(html);
        }
        if let Some(ref packages) = self.packages {
            config.packages.clone_from(packages);
        }
        if let Some(ref go_bin) = self.go_bin {
            config.go_bin.clone_from(go_bin);
        }
        if let Some(ref workdir) = self.workdir {
            config.workdir = Some(workdir.clone());
        }
        config
    }
}
