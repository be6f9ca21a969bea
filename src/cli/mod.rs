//! CLI module
//!
//! Provides command-line interface for:
//! - serve: start the HTTP API
//! - validate: check attribute definitions
//! - evaluate: offline audit of one work paper
//! - export: findings CSV from a stored conclusion

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{evaluate, export, load_attributes, run, run_command, serve, validate};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_json_file, write_response, write_text};
