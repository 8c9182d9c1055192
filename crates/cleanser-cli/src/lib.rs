//! Cleanser CLI library.
//!
//! This library provides the core functionality for the `cleanser` command-line
//! interface, including configuration merging, logging setup, command
//! execution and report formatting.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;

pub use cli::{Cli, CliFormat, Command};
pub use error::{CliError, Result};
pub use output::Formatter;
