//! # Kit Stager Library
//!
//! Stages an architecture-scoped package *kit*: a flat directory of packages
//! gathered from named package groups, followed by repository metadata
//! generated over it. It backs the `kit-stager` command-line tool.
//!
//! ## Quick Example
//!
//! ```no_run
//! use kit_stager::config::KitConfig;
//! use kit_stager::pipeline::{self, RunOptions};
//!
//! let config = KitConfig::new(
//!     "build/rpms",
//!     vec!["core".to_string(), "extras".to_string()],
//!     "build/kits",
//!     "x86_64",
//! );
//! let summary = pipeline::run(&config, &RunOptions::default()).unwrap();
//! assert!(summary.validated);
//! ```
//!
//! ## Core Concepts
//!
//! - **Configuration (`config`)**: the validated inputs of one run, and the
//!   paths derived from them (`<output>/<arch>/Packages`).
//! - **Selection (`filter`)**: which package-group entries qualify. Debug
//!   artifacts, empty files and non-files are left out.
//! - **Staging (`stager`)**: plan the copy, reset the kit directory, copy
//!   packages flat with mode `0644` and original timestamps.
//! - **Tools (`tools`)**: the metadata generator and the repository query run
//!   over the finished kit.
//! - **Pipeline (`pipeline`)**: runs the above in order and stops at the first
//!   failure.
//!
//! Errors are reported through [`error::Error`], which also decides the
//! process exit status.

pub mod config;
pub mod error;
pub mod filter;
pub mod output;
pub mod pipeline;
pub mod stager;
pub mod suggestions;
pub mod tools;

#[cfg(test)]
mod filter_proptest;
