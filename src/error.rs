//! # Error Handling
//!
//! This module defines the centralized error type for `kit-stager`. It uses
//! the `thiserror` library to describe every failure class the pipeline can
//! hit, with enough context (paths, tool names, exit statuses) to produce a
//! useful message.
//!
//! ## Key Components
//!
//! - **`Error`**: the enum of all failures, one variant per class:
//!   configuration problems, package-group lookups, filesystem operations,
//!   and external tool invocations.
//! - **`Result<T>`**: a type alias for `std::result::Result<T, Error>`.
//!
//! [`Error::exit_code`] maps each failure to the exit status the binary
//! reports, so a failing external tool's own status reaches the caller.

use std::path::PathBuf;

use thiserror::Error;

/// Exit status for usage and configuration errors, matching clap.
pub const EXIT_USAGE: u8 = 2;

/// Exit status for every other failure.
pub const EXIT_FAILURE: u8 = 1;

/// Main error type for kit-stager operations
#[derive(Error, Debug)]
pub enum Error {
    /// The configuration is incomplete or contradictory.
    ///
    /// Includes an optional hint about how to fix it.
    #[error("Configuration error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    Config {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// A package-group name that cannot name a single subdirectory.
    #[error("Invalid package group '{group}': {reason}")]
    InvalidPackageGroup { group: String, reason: String },

    /// A requested package group has no directory under the packages root.
    #[error("Package group '{group}' not found at {}", path.display())]
    MissingPackageGroup { group: String, path: PathBuf },

    /// A filesystem operation on the packages root or the kit failed.
    #[error("Filesystem error: {operation} '{}': {source}", path.display())]
    Filesystem {
        operation: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An external tool could not be started at all.
    #[error("Failed to launch {tool} ({program}): {source}")]
    ToolLaunch {
        tool: String,
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// A required external tool is not installed.
    #[error("Required {tool} not found: {program}\n  hint: install it or point --{flag} at it")]
    ToolMissing {
        tool: String,
        program: String,
        /// CLI flag that selects the program
        flag: String,
    },

    /// An external tool ran and exited unsuccessfully.
    #[error("{tool} failed: `{command}` exited with {}", status.map(|c| format!("status {}", c)).unwrap_or_else(|| "a signal".to_string()))]
    ToolFailed {
        tool: String,
        command: String,
        /// Exit code, or `None` when the process was terminated by a signal
        status: Option<i32>,
    },

    /// A glob pattern error, wrapped from `glob::PatternError`.
    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),

    /// A directory walk error, wrapped from `walkdir::Error`.
    #[error("Directory listing error: {0}")]
    Walk(#[from] walkdir::Error),
}

impl Error {
    /// Build a [`Error::Filesystem`] from an operation, a path and the I/O error.
    pub fn filesystem(
        operation: impl Into<String>,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Error::Filesystem {
            operation: operation.into(),
            path: path.into(),
            source,
        }
    }

    /// The process exit status this error should produce.
    ///
    /// Configuration problems exit with [`EXIT_USAGE`]. A tool that exited
    /// with a nonzero code hands that code through unchanged; anything else
    /// exits with [`EXIT_FAILURE`].
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::Config { .. } | Error::InvalidPackageGroup { .. } => EXIT_USAGE,
            Error::ToolFailed {
                status: Some(code), ..
            } => u8::try_from(*code)
                .ok()
                .filter(|c| *c != 0)
                .unwrap_or(EXIT_FAILURE),
            _ => EXIT_FAILURE,
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
