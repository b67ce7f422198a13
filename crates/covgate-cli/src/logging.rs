//! Diagnostic logging setup
//!
//! `RUST_LOG` wins when set; otherwise the level follows `-v`/`-q`.
//! Logs always go to stderr so stdout stays the pipeline transcript.

use covgate::GateConfig;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set
#[must_use]
pub fn default_filter(config: &GateConfig) -> EnvFilter {
    EnvFilter::new(config.verbosity.log_directive())
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init_tracing(config: &GateConfig, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(config));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let result = if json {
        builder.json().try_init()
    } else {
        builder
            .with_ansi(config.color.should_color())
            .try_init()
    };

    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
