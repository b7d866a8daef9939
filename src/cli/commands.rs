//! CLI commands and argument parsing

use crate::types::Date;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Redmine Scroll CLI
#[derive(Parser, Debug)]
#[command(name = "redmine-scroll")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Base URL of the Redmine instance
    #[arg(short, long, global = true, env = "REDMINE_URL")]
    pub url: Option<String>,

    /// API key
    #[arg(short, long, global = true, env = "REDMINE_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Log requests and debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List all projects
    Projects,

    /// List all issues
    Issues,

    /// List time entries of a user
    TimeEntries {
        /// User id
        #[arg(long)]
        user: String,

        /// First day, defaults to the first day of the current month
        #[arg(long)]
        from: Option<Date>,

        /// Last day, defaults to the last day of the current month
        #[arg(long)]
        to: Option<Date>,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One line per item
    Text,
    /// JSON output (one item per line)
    Json,
}
