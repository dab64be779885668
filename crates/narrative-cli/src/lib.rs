//! Narrative Lens CLI library.
//!
//! Configuration, command execution and output formatting for the `narrative`
//! binary. Commands return their rendered output so they can be tested without
//! a terminal.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod repl;

pub use cli::{Cli, Command};
pub use commands::Context;
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
