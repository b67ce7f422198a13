//! Go toolchain command lines

use crate::config::GateConfig;
use crate::executor::shell_quote;

/// Builds the shell command line for each pipeline step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoToolchain {
    go: String,
    packages: String,
    profile: String,
    html: String,
}

impl Default for GoToolchain {
    fn default() -> Self {
        Self::from_config(&GateConfig::default())
    }
}

impl GoToolchain {
    /// Toolchain commands for the given configuration
    #[must_use]
    pub fn from_config(config: &GateConfig) -> Self {
        Self {
            go: shell_quote(&config.go_bin),
            packages: shell_quote(&config.packages),
            profile: shell_quote(&config.profile),
            html: shell_quote(&config.html),
        }
    }

    /// `go test -cover ./...`
    #[must_use]
    pub fn test_with_coverage(&self) -> String {
        format!("{} test -cover {}", self.go, self.packages)
    }

    /// `go test -coverprofile=coverage.out ./...`
    #[must_use]
    pub fn generate_profile(&self) -> String {
        format!(
            "{} test -coverprofile={} {}",
            self.go, self.profile, self.packages
        )
    }

    /// `go tool cover -func=coverage.out`
    #[must_use]
    pub fn function_report(&self) -> String {
        format!("{} tool cover -func={}", self.go, self.profile)
    }

    /// `go tool cover -html=coverage.out -o coverage.html`
    #[must_use]
    pub fn html_report(&self) -> String {
        format!(
            "{} tool cover -html={} -o {}",
            self.go, self.profile, self.html
        )
    }

    /// Fresh profile followed by the function report, whose `total:` line
    /// is then compared against the threshold
    #[must_use]
    pub fn threshold_report(&self) -> String {
        format!(
            "{} test -cover -coverprofile={} {} && {}",
            self.go,
            self.profile,
            self.packages,
            self.function_report()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_commands() {
        let go = GoToolchain::default();
        assert_eq!(go.test_with_coverage(), "go test -cover ./...");
        assert_eq!(
            go.generate_profile(),
            "go test -coverprofile=coverage.out ./..."
        );
        assert_eq!(go.function_report(), "go tool cover -func=coverage.out");
        assert_eq!(
            go.html_report(),
            "go tool cover -html=coverage.out -o coverage.html"
        );
        assert_eq!(
            go.threshold_report(),
            "go test -cover -coverprofile=coverage.out ./... && go tool cover -func=coverage.out"
        );
    }

    #[test]
    fn test_configured_paths() {
        let config = GateConfig::new()
            .with_go_bin("/opt/go/bin/go")
            .with_packages("./pkg/...")
            .with_profile("build/cov.out")
            .with_html("build/cov.html");
        let go = GoToolchain::from_config(&config);
        assert_eq!(go.test_with_coverage(), "/opt/go/bin/go test -cover ./pkg/...");
        assert_eq!(
            go.html_report(),
            "/opt/go/bin/go tool cover -html=build/cov.out -o build/cov.html"
        );
    }

    #[test]
    fn test_paths_with_spaces_are_quoted() {
        let config = GateConfig::new().with_profile("my reports/cov.out");
        let go = GoToolchain::from_config(&config);
        assert_eq!(
            go.function_report(),
            "go tool cover -func='my reports/cov.out'"
        );
    }
}
