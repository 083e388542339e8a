//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the notecraft binary.

mod commands;
mod generate;
mod interactive;
mod print;

pub use commands::{Cli, Commands, ConfigCommands, Mode};
pub use generate::handle_command;
pub use interactive::run as run_interactive;
