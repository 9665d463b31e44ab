//! CLI module
//!
//! Command-line interface for querying a Redmine server.
//!
//! # Commands
//!
//! - `issues` / `issue` - List issues or show one issue
//! - `projects` / `project` - List projects or show one project
//! - `users` / `current-user` - List users or show the authenticated user
//! - `time-entries`, `statuses`, `trackers`, `news`, `queries` - Other lists
//! - `versions` / `categories` - Per-project lookups

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
