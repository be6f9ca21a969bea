//! CLI argument definitions using clap
//!
//! Commands:
//! - workaudit serve [--config <path>] [--port <port>]
//! - workaudit validate --attributes <file>
//! - workaudit evaluate --attributes <file> --work-paper <file> [--config <path>]
//! - workaudit export --conclusion <file>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// workaudit - score work papers against audit attributes
#[derive(Parser, Debug)]
#[command(name = "workaudit")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP API
    Serve {
        /// Configuration file (default: ./workaudit.json when present)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Validate a JSON array of attribute definitions
    Validate {
        #[arg(long)]
        attributes: PathBuf,
    },

    /// Evaluate one work paper offline and print its conclusion
    Evaluate {
        /// JSON array of attribute definitions, in evaluation order
        #[arg(long)]
        attributes: PathBuf,

        /// JSON work paper submission
        #[arg(long)]
        work_paper: PathBuf,

        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the findings of a conclusion as CSV
    Export {
        /// JSON conclusion as printed by `evaluate`
        #[arg(long)]
        conclusion: PathBuf,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
