//! Config command handler

use crate::ConfigArgs;
use covgate::{format_percent, CovResult, GateConfig};

/// Execute the config command
pub fn execute_config(config: &GateConfig, args: &ConfigArgs) -> CovResult<()> {
    println!("{}", render_config(config, args)?);
    Ok(())
}

/// Render the configuration in the requested format
pub fn render_config(config: &GateConfig, args: &ConfigArgs) -> CovResult<String> {
    if args.json {
        Ok(serde_json::to_string_pretty(config)?)
    } else if args.yaml {
        Ok(serde_yaml_ng::to_string(config)?)
    } else {
        Ok(render_config_text(config))
    }
}

/// Human-readable configuration listing
#[must_use]
pub fn render_config_text(config: &GateConfig) -> String {
    let workdir = config
        .workdir
        .as_ref()
        .map_or_else(|| "(current directory)".to_string(), |p| p.display().to_string());

    let mut out = String::from("Current configuration:\n");
    out.push_str(&format!("  Go binary: {}\n", config.go_bin));
    out.push_str(&format!("  Packages: {}\n", config.packages));
    out.push_str(&format!("  Profile: {}\n", config.profile));
    out.push_str(&format!("  HTML report: {}\n", config.html));
    out.push_str(&format!("  Threshold: {}%\n", format_percent(config.threshold)));
    out.push_str(&format!("  Working directory: {workdir}\n"));
    out.push_str(&format!("  Verbosity: {:?}\n", config.verbosity));
    out.push_str(&format!("  Color: {:?}", config.color));
    out
}
