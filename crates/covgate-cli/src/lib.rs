//! covgate CLI library
//!
//! Argument parsing, logging setup and command handlers for the `covgate`
//! binary.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::format_push_string)] // String building is clear and correct

mod commands;
pub mod handlers;
pub mod logging;

pub use commands::{Cli, ColorArg, Commands, ConfigArgs, FormatArg};
