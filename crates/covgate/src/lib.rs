//! covgate: Go test coverage pipeline with threshold enforcement
//!
//! Runs the Go toolchain's coverage commands in a fixed order, echoes their
//! output, and turns the first fatal failure into the process exit code.
//!
//! ```no_run
//! use covgate::{GateConfig, Pipeline, ProgressReporter, ShellRunner};
//!
//! let config = GateConfig::default();
//! let runner = ShellRunner::new().with_workdir(config.workdir.clone());
//! let mut pipeline = Pipeline::new(config, runner, ProgressReporter::default());
//! let report = pipeline.run();
//! std::process::exit(i32::from(report.process_exit_code()));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

mod config;
mod error;
pub mod executor;
mod output;
pub mod pipeline;
pub mod report;
pub mod toolchain;

pub use config::{
    format_percent, ColorChoice, GateConfig, Verbosity, CONFIG_FILE_NAME, DEFAULT_THRESHOLD,
};
pub use error::{CovError, CovResult};
pub use executor::{CommandRunner, ExecResult, ShellRunner};
pub use output::{OutputFormat, ProgressReporter};
pub use pipeline::{Pipeline, PipelineReport, Step, StepReport, StepStatus};
pub use report::{FunctionCoverage, FunctionReport, ThresholdVerdict};
pub use toolchain::GoToolchain;
