//! Command execution through the shell

use crate::error::{CovError, CovResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

/// Exit code reported when the shell cannot be spawned
pub const SPAWN_FAILURE_CODE: i32 = 127;

/// Captured result of one external command
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExecResult {
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
    /// Exit code of the command
    pub exit_code: i32,
}

impl ExecResult {
    /// Create a result from its parts
    #[must_use]
    pub fn new(stdout: impl Into<String>, stderr: impl Into<String>, exit_code: i32) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
            exit_code,
        }
    }

    /// Successful result with the given stdout
    #[must_use]
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self::new(stdout, "", 0)
    }

    /// Failed result with the given stderr and exit code
    #[must_use]
    pub fn failed(stderr: impl Into<String>, exit_code: i32) -> Self {
        Self::new("", stderr, exit_code)
    }

    /// Whether the command exited with code 0
    #[must_use]
    pub const fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs a command line and captures its output
pub trait CommandRunner {
    /// Run `command` to completion
    ///
    /// # Errors
    ///
    /// Only when the command could not be started at all. A command that
    /// runs and fails is an `Ok` result with a non-zero exit code.
    fn run(&mut self, command: &str) -> CovResult<ExecResult>;
}

/// Production runner: `sh -c <command>`, blocking, no timeout
#[derive(Debug, Clone, Default)]
pub struct ShellRunner {
    workdir: Option<PathBuf>,
}

impl ShellRunner {
    /// Runner inheriting the current working directory
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run commands in `workdir` instead of the current directory
    #[must_use]
    pub fn with_workdir(mut self, workdir: Option<PathBuf>) -> Self {
        self.workdir = workdir;
        self
    }

    // Command lines are quoted with `shell_quote`, so they always go to a
    // POSIX `sh`, never `cmd.exe`
    fn shell_command(&self, command: &str) -> Command {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", command]);
        if let Some(ref dir) = self.workdir {
            cmd.current_dir(dir);
        }
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}

impl CommandRunner for ShellRunner {
    fn run(&mut self, command: &str) -> CovResult<ExecResult> {
        let start = Instant::now();
        let output = self
            .shell_command(command)
            .output()
            .map_err(|e| CovError::spawn(command, e))?;

        let result = ExecResult {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: exit_code_of(output.status),
        };
        log_execution(command, &result, start.elapsed());
        Ok(result)
    }
}

fn log_execution(command: &str, result: &ExecResult, elapsed: Duration) {
    tracing::debug!(
        command,
        exit_code = result.exit_code,
        elapsed_ms = elapsed.as_millis() as u64,
        stdout_bytes = result.stdout.len(),
        stderr_bytes = result.stderr.len(),
        "command finished"
    );
}

/// Exit code of a finished child, `128 + signal` when it was killed
#[must_use]
pub fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}

/// Quote a value for inclusion in a POSIX shell command line
#[must_use]
pub fn shell_quote(value: &str) -> String {
    let is_plain = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '.' | '_' | '-' | '=' | ':' | '+' | ','));
    if is_plain {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\'', r"'\''"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod exec_result_tests {
        use super::*;

        #[test]
        fn test_ok_result() {
            let result = ExecResult::ok("PASS");
            assert!(result.success());
            assert_eq!(result.stdout, "PASS");
            assert!(result.stderr.is_empty());
        }

        #[test]
        fn test_failed_result() {
            let result = ExecResult::failed("build failed", 2);
            assert!(!result.success());
            assert_eq!(result.exit_code, 2);
            assert_eq!(result.stderr, "build failed");
        }

        #[test]
        fn test_serialize() {
            let json = serde_json::to_string(&ExecResult::new("out", "err", 3)).unwrap();
            assert!(json.contains("\"exit_code\":3"));
        }
    }

    mod shell_quote_tests {
        use super::*;

        #[test]
        fn test_plain_values_untouched() {
            assert_eq!(shell_quote("coverage.out"), "coverage.out");
            assert_eq!(shell_quote("./..."), "./...");
            assert_eq!(shell_quote("/usr/local/go/bin/go"), "/usr/local/go/bin/go");
        }

        #[test]
        fn test_spaces_are_quoted() {
            assert_eq!(shell_quote("my dir/cov.out"), "'my dir/cov.out'");
        }

        #[test]
        fn test_single_quote_escaped() {
            assert_eq!(shell_quote("it's"), r"'it'\''s'");
        }

        #[test]
        fn test_empty_is_quoted() {
            assert_eq!(shell_quote(""), "''");
        }
    }

    mod shell_command_tests {
        use super::*;
        use std::ffi::OsStr;

        #[test]
        fn test_always_posix_sh() {
            let cmd = ShellRunner::new().shell_command("go test -cover './my pkg/...'");
            assert_eq!(cmd.get_program(), OsStr::new("sh"));
            let args: Vec<&OsStr> = cmd.get_args().collect();
            assert_eq!(args, [OsStr::new("-c"), OsStr::new("go test -cover './my pkg/...'")]);
        }

        #[test]
        fn test_workdir_applied() {
            let cmd = ShellRunner::new()
                .with_workdir(Some(PathBuf::from("/src/app")))
                .shell_command("true");
            assert_eq!(cmd.get_current_dir(), Some(std::path::Path::new("/src/app")));
        }
    }

    #[cfg(unix)]
    mod shell_runner_tests {
        use super::*;
        use tempfile::TempDir;

        #[test]
        fn test_captures_stdout() {
            let result = ShellRunner::new().run("echo hello").unwrap();
            assert!(result.success());
            assert_eq!(result.stdout.trim(), "hello");
        }

        #[test]
        fn test_captures_stderr_and_exit_code() {
            let result = ShellRunner::new().run("echo oops >&2; exit 3").unwrap();
            assert_eq!(result.exit_code, 3);
            assert_eq!(result.stderr.trim(), "oops");
        }

        #[test]
        fn test_and_chain_stops_on_failure() {
            let result = ShellRunner::new().run("false && echo never").unwrap();
            assert_eq!(result.exit_code, 1);
            assert!(result.stdout.is_empty());
        }

        #[test]
        fn test_missing_command_is_127() {
            let result = ShellRunner::new()
                .run("covgate-definitely-not-installed-xyz")
                .unwrap();
            assert_eq!(result.exit_code, 127);
        }

        #[test]
        fn test_workdir() {
            let temp = TempDir::new().unwrap();
            std::fs::write(temp.path().join("marker.txt"), "here").unwrap();
            let result = ShellRunner::new()
                .with_workdir(Some(temp.path().to_path_buf()))
                .run("cat marker.txt")
                .unwrap();
            assert_eq!(result.stdout, "here");
        }

        #[test]
        fn test_signal_exit_code() {
            let result = ShellRunner::new().run("kill -9 $$").unwrap();
            assert_eq!(result.exit_code, 128 + 9);
        }

        #[test]
        fn test_invalid_utf8_is_lossy() {
            let result = ShellRunner::new().run("printf '\\377ok'").unwrap();
            assert!(result.stdout.ends_with("ok"));
            assert!(result.stdout.contains('\u{FFFD}'));
        }
    }
}
