//! vafs CLI entry point.
//!
//! # Responsibility
//! - Parse arguments, bootstrap logging and the store connection.
//! - Run exactly one command and report its outcome.

use clap::Parser;

mod commands;

use commands::Cli;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = cli.execute() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
