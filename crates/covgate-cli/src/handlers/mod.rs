//! Command handlers - extracted from main.rs for testability

pub mod config;
pub mod run;

pub use config::{execute_config, render_config, render_config_text};
pub use run::{execute_check, execute_run, execute_steps};
