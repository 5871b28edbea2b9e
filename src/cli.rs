//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::Parser;

use crate::commands;
use kit_stager::error::{Error, EXIT_FAILURE};

/// Kit Stager - Stage package kits and regenerate their repository metadata
#[derive(Parser, Debug)]
#[command(name = "kit-stager")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    stage: commands::stage::StageArgs,

    /// Colorize output (always, never, auto)
    #[arg(
        long,
        value_name = "WHEN",
        default_value = "auto",
        value_parser = ["always", "never", "auto"]
    )]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL", env = "KIT_STAGER_LOG", default_value = "warn")]
    log_level: String,
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(&self) -> Result<()> {
        init_logging(&self.log_level);
        commands::stage::execute(&self.stage, &self.color)
    }
}

/// Install the `env_logger` backend. Later calls are no-ops.
fn init_logging(level: &str) {
    let _ = env_logger::Builder::new()
        .parse_filters(level)
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}

/// Exit status for a failed run.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<Error>()
        .map(Error::exit_code)
        .unwrap_or(EXIT_FAILURE)
}
