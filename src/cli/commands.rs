//! CLI commands and argument parsing

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Command-line client for the Redmine REST API
#[derive(Parser, Debug)]
#[command(name = "redmine-client")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Server address including protocol and port
    #[arg(short, long, global = true, env = "REDMINE_URL")]
    pub url: Option<String>,

    /// API access key
    #[arg(short = 'k', long, global = true, env = "REDMINE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Login for HTTP Basic authentication
    #[arg(long, global = true, env = "REDMINE_USER")]
    pub user: Option<String>,

    /// Password for HTTP Basic authentication
    #[arg(long, global = true, env = "REDMINE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Objects requested per list request
    #[arg(short, long, global = true)]
    pub page_size: Option<usize>,

    /// Pagination dialect (offset_limit, page_number)
    #[arg(short, long, global = true)]
    pub dialect: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "pretty")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List issues, optionally filtered by project or saved query
    Issues {
        /// Project identifier
        #[arg(long)]
        project: Option<String>,

        /// Saved query id
        #[arg(long)]
        query_id: Option<u32>,

        /// Associated data to include (journals, relations, attachments)
        #[arg(long, value_delimiter = ',')]
        include: Vec<String>,
    },

    /// Show a single issue
    Issue {
        /// Issue id
        id: u32,

        /// Associated data to include (journals, relations, attachments)
        #[arg(long, value_delimiter = ',')]
        include: Vec<String>,
    },

    /// List projects visible to the current user
    Projects,

    /// Show a single project by its identifier
    Project {
        /// Project identifier
        key: String,
    },

    /// List users (requires admin rights)
    Users,

    /// Show the authenticated user
    CurrentUser,

    /// List time entries, optionally for one issue
    TimeEntries {
        /// Issue id
        #[arg(long)]
        issue: Option<u32>,
    },

    /// List issue statuses
    Statuses,

    /// List trackers
    Trackers,

    /// List versions of a project
    Versions {
        /// Numeric project id
        project_id: u32,
    },

    /// List issue categories of a project
    Categories {
        /// Numeric project id
        project_id: u32,
    },

    /// List news, optionally for one project
    News {
        /// Project identifier
        #[arg(long)]
        project: Option<String>,
    },

    /// List saved queries, optionally for one project
    Queries {
        /// Project identifier
        #[arg(long)]
        project: Option<String>,
    },
}

/// Output format
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Single-line JSON
    Json,
    /// Pretty-printed JSON
    #[default]
    Pretty,
}
