//! CLI module
//!
//! Command-line interface printing Redmine collections.
//!
//! # Commands
//!
//! - `projects` - List all projects
//! - `issues` - List all issues
//! - `time-entries` - List time entries of a user over a range of dates

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
