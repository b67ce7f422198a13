//! The five-step coverage pipeline
//!
//! Steps run strictly in order. A failing step other than the HTML report
//! halts the pipeline, and its exit code becomes the pipeline's exit code.

use crate::config::{format_percent, GateConfig};
use crate::executor::{CommandRunner, ExecResult, SPAWN_FAILURE_CODE};
use crate::output::ProgressReporter;
use crate::report::{FunctionReport, ThresholdVerdict};
use crate::toolchain::GoToolchain;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Exit code used when the coverage total is below the threshold or missing
pub const BELOW_THRESHOLD_CODE: i32 = 1;

/// Number of least covered functions listed in verbose mode
const LOWEST_FUNCTIONS_SHOWN: usize = 5;

/// A pipeline step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// `go test -cover`
    TestWithCoverage,
    /// `go test -coverprofile`
    GenerateProfile,
    /// `go tool cover -func`
    FunctionReport,
    /// `go tool cover -html`
    HtmlReport,
    /// Fresh profile plus function report, total compared to the threshold
    ThresholdCheck,
}

impl Step {
    /// Every step, in execution order
    pub const ALL: [Self; 5] = [
        Self::TestWithCoverage,
        Self::GenerateProfile,
        Self::FunctionReport,
        Self::HtmlReport,
        Self::ThresholdCheck,
    ];

    /// Short name of the step
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::TestWithCoverage => "test-with-coverage",
            Self::GenerateProfile => "generate-profile",
            Self::FunctionReport => "function-report",
            Self::HtmlReport => "html-report",
            Self::ThresholdCheck => "threshold-check",
        }
    }

    /// Whether a failure of this step halts the pipeline
    #[must_use]
    pub const fn is_fatal(self) -> bool {
        !matches!(self, Self::HtmlReport)
    }

    /// Command line this step runs
    #[must_use]
    pub fn command(self, toolchain: &GoToolchain) -> String {
        match self {
            Self::TestWithCoverage => toolchain.test_with_coverage(),
            Self::GenerateProfile => toolchain.generate_profile(),
            Self::FunctionReport => toolchain.function_report(),
            Self::HtmlReport => toolchain.html_report(),
            Self::ThresholdCheck => toolchain.threshold_report(),
        }
    }

    /// Message printed before the step runs
    #[must_use]
    pub fn progress_message(self, threshold: f64) -> String {
        match self {
            Self::TestWithCoverage => "Running tests with coverage...".to_string(),
            Self::GenerateProfile => "Generating coverage profile...".to_string(),
            Self::FunctionReport => "Viewing coverage report...".to_string(),
            Self::HtmlReport => "Generating HTML coverage report...".to_string(),
            Self::ThresholdCheck => format!(
                "Checking if coverage meets {}% threshold...",
                format_percent(threshold)
            ),
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// How a step ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// Command succeeded (and, for the threshold check, the gate passed)
    Passed,
    /// Step failed and halted the pipeline
    Failed,
    /// Step failed but the pipeline continued
    Warned,
}

/// Record of one executed step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    /// Which step
    pub step: Step,
    /// Command line that was run
    pub command: String,
    /// Exit code of the command
    pub exit_code: i32,
    /// Outcome
    pub status: StepStatus,
    /// Wall time in milliseconds
    pub elapsed_ms: u64,
}

/// Aggregated result of a pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineReport {
    /// Executed steps, in order
    pub steps: Vec<StepReport>,
    /// Threshold in effect
    pub threshold: f64,
    /// Parsed function report, when a report step produced one
    pub functions: Option<FunctionReport>,
    /// Threshold verdict, when the check ran to completion
    pub verdict: Option<ThresholdVerdict>,
    /// Exit code the process should end with
    pub exit_code: i32,
    /// Total wall time in milliseconds
    pub elapsed_ms: u64,
}

impl PipelineReport {
    fn new(threshold: f64) -> Self {
        Self {
            steps: Vec::new(),
            threshold,
            functions: None,
            verdict: None,
            exit_code: 0,
            elapsed_ms: 0,
        }
    }

    /// Whether every executed step passed or was tolerated
    #[must_use]
    pub const fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Step that halted the pipeline, if any
    #[must_use]
    pub fn failed_step(&self) -> Option<Step> {
        self.steps
            .iter()
            .find(|s| s.status == StepStatus::Failed)
            .map(|s| s.step)
    }

    /// Steps that failed without halting
    #[must_use]
    pub fn warnings(&self) -> Vec<Step> {
        self.steps
            .iter()
            .filter(|s| s.status == StepStatus::Warned)
            .map(|s| s.step)
            .collect()
    }

    /// Exit code narrowed to what a process can report: non-zero codes
    /// outside `1..=255` become 1
    #[must_use]
    pub fn process_exit_code(&self) -> u8 {
        match self.exit_code {
            0 => 0,
            code => u8::try_from(code).unwrap_or(1),
        }
    }
}

/// Drives the steps through a [`CommandRunner`]
#[derive(Debug)]
pub struct Pipeline<R: CommandRunner> {
    config: GateConfig,
    toolchain: GoToolchain,
    runner: R,
    reporter: ProgressReporter,
}

impl<R: CommandRunner> Pipeline<R> {
    /// Create a pipeline for `config`
    #[must_use]
    pub fn new(config: GateConfig, runner: R, reporter: ProgressReporter) -> Self {
        let toolchain = GoToolchain::from_config(&config);
        Self {
            config,
            toolchain,
            runner,
            reporter,
        }
    }

    /// Run all five steps
    pub fn run(&mut self) -> PipelineReport {
        self.run_steps(&Step::ALL)
    }

    /// Run only the threshold check
    pub fn check(&mut self) -> PipelineReport {
        self.run_steps(&[Step::ThresholdCheck])
    }

    /// Run the given steps in order, stopping at the first fatal failure
    pub fn run_steps(&mut self, steps: &[Step]) -> PipelineReport {
        let start = Instant::now();
        let mut report = PipelineReport::new(self.config.threshold);
        tracing::info!(steps = steps.len(), threshold = self.config.threshold, "pipeline started");

        for &step in steps {
            let step_report = self.run_step(step, &mut report);
            let halted = step_report.status == StepStatus::Failed;
            let exit_code = step_report.exit_code;
            report.steps.push(step_report);

            if halted {
                report.exit_code = exit_code;
                tracing::info!(%step, exit_code = report.exit_code, "pipeline halted");
                break;
            }
        }

        report.elapsed_ms = start.elapsed().as_millis() as u64;
        if self.config.verbosity.is_verbose() {
            for warned in report.warnings() {
                self.reporter.warning(&format!("{warned} failed, continued"));
            }
            if let Some(failed) = report.failed_step() {
                self.reporter.warning(&format!("Halted at {failed}"));
            }
            self.reporter
                .summary(report.steps.len(), report.exit_code, start.elapsed());
        }
        tracing::info!(exit_code = report.exit_code, elapsed_ms = report.elapsed_ms, "pipeline finished");
        report
    }

    fn execute(&mut self, step: Step, command: &str) -> ExecResult {
        tracing::info!(%step, command, "running step");
        self.reporter.start_spinner(command);
        let result = self.runner.run(command);
        self.reporter.finish_spinner();

        result.unwrap_or_else(|e| {
            tracing::error!(%step, error = %e, "could not start command");
            ExecResult::failed(e.to_string(), SPAWN_FAILURE_CODE)
        })
    }

    fn run_step(&mut self, step: Step, report: &mut PipelineReport) -> StepReport {
        let start = Instant::now();
        let command = step.command(&self.toolchain);
        self.reporter
            .progress(&step.progress_message(self.config.threshold));

        let result = self.execute(step, &command);
        let status = match step {
            Step::TestWithCoverage | Step::FunctionReport => {
                self.reporter.output(&result.stdout);
                if step == Step::FunctionReport && result.success() {
                    report.functions = Some(FunctionReport::parse(&result.stdout));
                }
                self.command_status(step, &result)
            }
            Step::GenerateProfile => self.command_status(step, &result),
            Step::HtmlReport => {
                let status = self.command_status(step, &result);
                if status == StepStatus::Passed {
                    self.reporter
                        .success(&format!("HTML report generated: {}", self.config.html));
                }
                status
            }
            Step::ThresholdCheck => self.threshold_status(&result, report),
        };

        StepReport {
            step,
            command,
            exit_code: if status == StepStatus::Failed && result.success() {
                BELOW_THRESHOLD_CODE
            } else {
                result.exit_code
            },
            status,
            elapsed_ms: start.elapsed().as_millis() as u64,
        }
    }

    /// Outcome of a plain command step; failures print `Error: <stderr>`
    fn command_status(&self, step: Step, result: &ExecResult) -> StepStatus {
        if result.success() {
            return StepStatus::Passed;
        }
        self.reporter.error(&result.stderr);
        if step.is_fatal() {
            StepStatus::Failed
        } else {
            tracing::warn!(%step, exit_code = result.exit_code, "step failed, continuing");
            StepStatus::Warned
        }
    }

    fn threshold_status(&self, result: &ExecResult, report: &mut PipelineReport) -> StepStatus {
        let threshold = self.config.threshold;
        let below_message = format!("Coverage is below {}%", format_percent(threshold));

        if !result.success() {
            self.reporter.error(&result.stderr);
            self.reporter.verdict(&below_message, false);
            return StepStatus::Failed;
        }

        let functions = FunctionReport::parse(&result.stdout);
        let verdict = ThresholdVerdict::evaluate(functions.total, threshold);
        report.verdict = Some(verdict);

        tracing::debug!(
            total = ?verdict.total(),
            threshold,
            passed = verdict.passed(),
            "coverage gate evaluated"
        );

        let status = match verdict {
            ThresholdVerdict::Meets { .. } => {
                self.reporter.verdict(
                    &format!("Coverage meets or exceeds {}%", format_percent(threshold)),
                    true,
                );
                StepStatus::Passed
            }
            ThresholdVerdict::Below { total } => {
                self.reporter.verdict(&below_message, false);
                if self.config.verbosity.is_verbose() {
                    self.list_lowest(&functions, total);
                }
                StepStatus::Failed
            }
            ThresholdVerdict::Missing => {
                self.reporter.error("no coverage total found in report");
                self.reporter.verdict(&below_message, false);
                StepStatus::Failed
            }
        };
        report.functions = Some(functions);
        status
    }

    fn list_lowest(&self, functions: &FunctionReport, total: f64) {
        self.reporter
            .warning(&format!("Total coverage: {}%", format_percent(total)));
        for f in functions.lowest(LOWEST_FUNCTIONS_SHOWN) {
            self.reporter.warning(&format!(
                "  {:>6}%  {} ({})",
                format_percent(f.percent),
                f.function,
                f.location
            ));
        }
        let uncovered = functions.uncovered().len();
        if uncovered > 0 {
            self.reporter
                .warning(&format!("{uncovered} function(s) have no coverage"));
        }
    }

    #[cfg(test)]
    const fn reporter(&self) -> &ProgressReporter {
        &self.reporter
    }

    #[cfg(test)]
    const fn runner(&self) -> &R {
        &self.runner
    }
}
