//! workaudit CLI entry point
//!
//! Parses arguments and dispatches through `cli::run`; on failure prints
//! `CODE: message` to stderr and exits non-zero.

use workaudit::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
