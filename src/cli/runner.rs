//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::{ScrollConfig, TimeEntriesFilter};
use crate::decode::Entity;
use crate::engine::scroll;
use crate::error::{Error, Result};
use crate::types::{Date, Issue, Project, TimeEntry};
use chrono::{Datelike, Local, Months, NaiveDate};
use serde::Serialize;
use std::fmt::Display;
use std::sync::Arc;
use tracing::debug;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = self.load_config()?;

        match &self.cli.command {
            Commands::Projects => self.print_all::<Project>(config).await,
            Commands::Issues => self.print_all::<Issue>(config).await,
            Commands::TimeEntries { user, from, to } => {
                let (month_start, month_end) = current_month(Local::now().date_naive());
                let filter = TimeEntriesFilter::new(
                    from.unwrap_or(month_start),
                    to.unwrap_or(month_end),
                    user.as_str(),
                );
                let config = ScrollConfig {
                    time_entries: filter,
                    ..config
                };
                self.print_all::<TimeEntry>(config).await
            }
        }
    }

    /// Build the scroll config from the config file and command line
    ///
    /// `--url` and `--token` (or their environment variables) take precedence
    /// over the file.
    fn load_config(&self) -> Result<ScrollConfig> {
        let mut config = match &self.cli.config {
            Some(path) => ScrollConfig::from_yaml_file(path)?,
            None => {
                let url = self
                    .cli
                    .url
                    .as_deref()
                    .ok_or_else(|| Error::missing_field("base_url (use --url or REDMINE_URL)"))?;
                ScrollConfig::builder(url, "").build()
            }
        };

        if let Some(url) = &self.cli.url {
            config.base_url.clone_from(url);
        }
        if let Some(token) = &self.cli.token {
            config.api_token.clone_from(token);
        }
        if self.cli.verbose {
            config.logging_enabled = true;
        }

        config.validate()?;
        Ok(config)
    }

    /// Scroll over a collection and print every item
    ///
    /// Transient errors are logged by the engine; the first fatal one is
    /// returned once both channels are closed.
    async fn print_all<E>(&self, config: ScrollConfig) -> Result<()>
    where
        E: Entity + Display + Serialize,
    {
        let mut scroll = scroll::<E>(Arc::new(config));
        let mut fatal = None;
        let mut items_open = true;
        let mut errors_open = true;

        while items_open || errors_open {
            tokio::select! {
                item = scroll.items.recv(), if items_open => match item {
                    Some(item) => self.output_item(&item),
                    None => items_open = false,
                },
                err = scroll.errors.recv(), if errors_open => match err {
                    Some(err) if err.is_fatal() && fatal.is_none() => fatal = Some(err),
                    Some(_) => {}
                    None => errors_open = false,
                },
            }
        }

        let stats = scroll.handle.join().await;
        debug!(
            "{} items, {} pages, {} errors in {}ms",
            stats.items_emitted, stats.pages_fetched, stats.errors, stats.duration_ms
        );

        fatal.map_or(Ok(()), Err)
    }

    fn output_item<E: Display + Serialize>(&self, item: &E) {
        match self.cli.format {
            OutputFormat::Text => println!("{item}"),
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(item).unwrap_or_default());
            }
        }
    }
}

/// First and last day of the month containing `today`
fn current_month(today: NaiveDate) -> (Date, Date) {
    let first = today.with_day(1).unwrap_or(today);
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(today);
    (Date(first), Date(last))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use test_case::test_case;

    fn date(s: &str) -> Date {
        Date::parse(s).unwrap()
    }

    #[test_case("2024-02-14", "2024-02-01", "2024-02-29" ; "leap february")]
    #[test_case("2023-02-01", "2023-02-01", "2023-02-28" ; "first day")]
    #[test_case("2024-12-31", "2024-12-01", "2024-12-31" ; "december")]
    fn test_current_month(today: &str, first: &str, last: &str) {
        assert_eq!(current_month(date(today).0), (date(first), date(last)));
    }

    #[test]
    fn test_url_required_without_config_file() {
        let cli = Cli::try_parse_from(["redmine-scroll", "projects"]).unwrap();
        let runner = Runner::new(Cli { url: None, ..cli });
        let err = runner.load_config().unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { .. }));
    }

    #[test]
    fn test_command_line_overrides_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "base_url: http://file.example.com\napi_token: from-file\nchannel_capacity: 4").unwrap();

        let cli = Cli::try_parse_from([
            "redmine-scroll",
            "-C",
            file.path().to_str().unwrap(),
            "--token",
            "from-cli",
            "-v",
            "issues",
        ])
        .unwrap();
        let runner = Runner::new(Cli { url: None, ..cli });
        let config = runner.load_config().unwrap();

        assert_eq!(config.base_url, "http://file.example.com");
        assert_eq!(config.api_token, "from-cli");
        assert_eq!(config.channel_capacity, 4);
        assert!(config.logging_enabled);
    }
}
