//! Run and check command handlers

use covgate::{
    CommandRunner, CovResult, GateConfig, OutputFormat, Pipeline, PipelineReport,
    ProgressReporter, ShellRunner, Step,
};

/// Execute the full pipeline and return the process exit code
pub fn execute_run(config: GateConfig, format: OutputFormat) -> CovResult<u8> {
    execute_steps(config, &Step::ALL, format)
}

/// Execute only the threshold check and return the process exit code
pub fn execute_check(config: GateConfig, format: OutputFormat) -> CovResult<u8> {
    execute_steps(config, &[Step::ThresholdCheck], format)
}

/// Execute `steps` through the shell
pub fn execute_steps(config: GateConfig, steps: &[Step], format: OutputFormat) -> CovResult<u8> {
    let runner = ShellRunner::new().with_workdir(config.workdir.clone());
    let report = run_with(config, runner, steps);
    if format == OutputFormat::Json {
        println!("{}", render_json(&report)?);
    }
    Ok(report.process_exit_code())
}

/// Run `steps` with any runner
pub fn run_with<R: CommandRunner>(config: GateConfig, runner: R, steps: &[Step]) -> PipelineReport {
    let reporter = reporter_for(&config);
    Pipeline::new(config, runner, reporter).run_steps(steps)
}

/// Progress reporter matching the configured color and verbosity
#[must_use]
pub fn reporter_for(config: &GateConfig) -> ProgressReporter {
    ProgressReporter::new(config.color.should_color(), config.verbosity.is_quiet())
}

/// Pretty JSON for a pipeline report
pub fn render_json(report: &PipelineReport) -> CovResult<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use covgate::{ColorChoice, ExecResult, StepStatus, Verbosity};

    #[derive(Debug)]
    struct FixedRunner(Vec<ExecResult>);

    impl CommandRunner for FixedRunner {
        fn run(&mut self, _command: &str) -> CovResult<ExecResult> {
            Ok(if self.0.is_empty() {
                ExecResult::ok("")
            } else {
                self.0.remove(0)
            })
        }
    }

    fn quiet_config() -> GateConfig {
        GateConfig::new()
            .with_verbosity(Verbosity::Quiet)
            .with_color(ColorChoice::Never)
    }

    #[test]
    fn test_reporter_for_quiet() {
        let reporter = reporter_for(&quiet_config());
        assert!(reporter.quiet);
        assert!(!reporter.use_color);
    }

    #[test]
    fn test_run_with_passing_check() {
        let runner = FixedRunner(vec![ExecResult::ok("total:\t(statements)\t92.5%\n")]);
        let report = run_with(quiet_config(), runner, &[Step::ThresholdCheck]);
        assert!(report.success());
        assert_eq!(report.steps[0].status, StepStatus::Passed);
    }

    #[test]
    fn test_run_with_failing_first_step() {
        let runner = FixedRunner(vec![ExecResult::failed("boom", 2)]);
        let report = run_with(quiet_config(), runner, &Step::ALL);
        assert_eq!(report.process_exit_code(), 2);
        assert_eq!(report.steps.len(), 1);
    }

    #[test]
    fn test_render_json() {
        let runner = FixedRunner(vec![ExecResult::ok("total:\t(statements)\t50.0%\n")]);
        let report = run_with(quiet_config(), runner, &[Step::ThresholdCheck]);
        let json = render_json(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["exit_code"], 1);
        assert_eq!(value["verdict"]["verdict"], "below");
        assert_eq!(value["steps"][0]["step"], "threshold_check");
    }

    #[cfg(unix)]
    #[test]
    fn test_execute_steps_through_shell() {
        let temp = tempfile::TempDir::new().unwrap();
        let config = quiet_config()
            .with_go_bin("false")
            .with_workdir(temp.path());
        let code = execute_steps(config, &[Step::GenerateProfile], OutputFormat::Text).unwrap();
        assert_eq!(code, 1);
    }
}
