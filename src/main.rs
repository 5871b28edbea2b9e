//! # Kit Stager CLI
//!
//! This is the binary entry point for the `kit-stager` command-line tool.
//!
//! Its responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Running the staging pipeline with the parsed configuration.
//! - Printing errors and choosing the exit status.
//!
//! The staging logic lives in the `kit_stager` library crate; the binary is a
//! thin wrapper around it.

mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    match cli.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", kit_stager::suggestions::render(&err));
            ExitCode::from(cli::exit_code(&err))
        }
    }
}
