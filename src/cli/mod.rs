//! CLI module
//!
//! Command-line interface for the pipeline.
//!
//! # Commands
//!
//! - `run` - Run the pipeline (default when no command is given)
//! - `validate` - Check the configuration
//! - `tables [TABLE]` - Show the output star schema

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;
