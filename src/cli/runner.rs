//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::types::Include;
use serde::Serialize;
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
        let manager = self.load_config()?.build_manager()?;
        debug!(
            dialect = %manager.dialect(),
            page_size = manager.objects_per_page(),
            "Manager ready"
        );

        match &self.cli.command {
            Commands::Issues {
                project,
                query_id,
                include,
            } => {
                let includes = parse_includes(include)?;
                let issues = manager
                    .get_issues(project.as_deref(), *query_id, &includes)
                    .await?;
                self.output(&issues)
            }
            Commands::Issue { id, include } => {
                let includes = parse_includes(include)?;
                self.output(&manager.get_issue_by_id(*id, &includes).await?)
            }
            Commands::Projects => self.output(&manager.get_projects().await?),
            Commands::Project { key } => self.output(&manager.get_project_by_key(key).await?),
            Commands::Users => self.output(&manager.get_users().await?),
            Commands::CurrentUser => self.output(&manager.get_current_user().await?),
            Commands::TimeEntries { issue } => {
                let entries = match issue {
                    Some(issue_id) => manager.get_time_entries_for_issue(*issue_id).await?,
                    None => manager.get_time_entries().await?,
                };
                self.output(&entries)
            }
            Commands::Statuses => self.output(&manager.get_statuses().await?),
            Commands::Trackers => self.output(&manager.get_trackers().await?),
            Commands::Versions { project_id } => {
                self.output(&manager.get_versions(*project_id).await?)
            }
            Commands::Categories { project_id } => {
                self.output(&manager.get_categories(*project_id).await?)
            }
            Commands::News { project } => self.output(&manager.get_news(project.as_deref()).await?),
            Commands::Queries { project } => {
                self.output(&manager.get_saved_queries(project.as_deref()).await?)
            }
        }
    }

    /// Build the client configuration from the config file and flags
    ///
    /// Flags override values read from the file.
    pub fn load_config(&self) -> Result<ClientConfig> {
        let cli = &self.cli;
        let mut config = match &cli.config {
            Some(path) => ClientConfig::load_unvalidated(path)?,
            None => ClientConfig::new(String::new()),
        };

        if let Some(url) = &cli.url {
            config.base_url.clone_from(url);
        }
        if config.base_url.trim().is_empty() {
            return Err(Error::config(
                "Server address not specified (use --url, REDMINE_URL or --config)",
            ));
        }
        if cli.api_key.is_some() {
            config.api_key.clone_from(&cli.api_key);
            config.username = None;
            config.password = None;
        }
        if cli.user.is_some() {
            config.username.clone_from(&cli.user);
            config.password.clone_from(&cli.password);
            config.api_key = None;
        }
        if let Some(page_size) = cli.page_size {
            config.objects_per_page = page_size;
        }
        if cli.dialect.is_some() {
            config.dialect.clone_from(&cli.dialect);
        }

        config.validate()?;
        Ok(config)
    }

    /// Print a value as JSON
    fn output<S: Serialize + ?Sized>(&self, value: &S) -> Result<()> {
        let rendered = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        println!("{rendered}");
        Ok(())
    }
}

impl std::fmt::Debug for Runner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runner")
            .field("command", &self.cli.command)
            .finish_non_exhaustive()
    }
}

fn parse_includes(raw: &[String]) -> Result<Vec<Include>> {
    raw.iter()
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.parse())
        .collect()
}
