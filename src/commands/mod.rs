//! # CLI Command Implementations
//!
//! `kit-stager` has a single command, staging a kit. It lives in its own
//! module with the usual shape:
//! - An `Args` struct that defines the arguments and options, derived using
//!   `clap`.
//! - An `execute` function that takes the parsed `Args`, builds the library
//!   configuration and reports the outcome.

pub mod stage;
