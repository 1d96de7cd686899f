//! Action inputs and runner context.
//!
//! Every flag falls back to the environment variable GitHub Actions sets for
//! it. Blank inputs count as unset so the defaults below apply.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use github::{GithubConfig, DEFAULT_API_URL, DEFAULT_GRAPHQL_URL};
use reconcile::config::{
    DEFAULT_BRANCH, DEFAULT_CATEGORY, DEFAULT_CLOSE_STATUSES, DEFAULT_SERVER_URL,
    DEFAULT_STATUS_PATTERN, DEFAULT_TITLE_PATTERN,
};
use reconcile::{RawSettings, RepositorySlug, SyncSettings};

#[derive(Debug, Parser)]
#[command(name = "adr-sync", version)]
#[command(about = "Keeps ADR files and their GitHub discussions in sync", long_about = None)]
pub struct Args {
    /// Token used for every API call
    #[arg(long, env = "INPUT_GITHUB-TOKEN", hide_env_values = true)]
    pub github_token: String,

    /// Branch ADRs are read from and committed to [default: main]
    #[arg(long, env = "INPUT_BRANCH")]
    pub branch: Option<String>,

    /// Discussion category holding ADR discussions [default: ADR]
    #[arg(long, env = "INPUT_DISCUSSION-CATEGORY")]
    pub discussion_category: Option<String>,

    /// Pattern with one capturing group extracting the status
    #[arg(long, env = "INPUT_STATUS-REGEX")]
    pub status_regex: Option<String>,

    /// Pattern a discussion title must match to be treated as an ADR
    #[arg(long, env = "INPUT_TITLE-REGEX")]
    pub title_regex: Option<String>,

    /// Comma-separated statuses whose discussion is closed
    #[arg(long, env = "INPUT_CLOSE-STATUSES")]
    pub close_statuses: Option<String>,

    /// Name of the triggering event
    #[arg(long, env = "GITHUB_EVENT_NAME")]
    pub event_name: String,

    /// File holding the triggering event payload
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    pub event_path: PathBuf,

    /// Repository as owner/name
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repository: String,

    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    #[arg(long, env = "GITHUB_GRAPHQL_URL", default_value = DEFAULT_GRAPHQL_URL)]
    pub graphql_url: String,

    /// Web root used for absolute blob links
    #[arg(long, env = "GITHUB_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    pub server_url: String,
}

fn or_default<'a>(value: &'a Option<String>, default: &'a str) -> &'a str {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(default)
}

impl Args {
    pub fn repository_slug(&self) -> Result<RepositorySlug> {
        RepositorySlug::parse(&self.repository).with_context(|| {
            format!(
                "Repository '{}' is not of the form owner/name",
                self.repository
            )
        })
    }

    /// Validated settings with defaults applied for blank inputs.
    pub fn settings(&self) -> Result<SyncSettings> {
        SyncSettings::from_raw(RawSettings {
            repository: self.repository_slug()?,
            branch: or_default(&self.branch, DEFAULT_BRANCH),
            category: or_default(&self.discussion_category, DEFAULT_CATEGORY),
            status_pattern: or_default(&self.status_regex, DEFAULT_STATUS_PATTERN),
            title_pattern: or_default(&self.title_regex, DEFAULT_TITLE_PATTERN),
            close_statuses: or_default(&self.close_statuses, DEFAULT_CLOSE_STATUSES),
            server_url: &self.server_url,
        })
        .context("Invalid action inputs")
    }

    pub fn github_config(&self, repository: RepositorySlug) -> GithubConfig {
        GithubConfig {
            token: self.github_token.clone(),
            api_url: self.api_url.clone(),
            graphql_url: self.graphql_url.clone(),
            repository,
        }
    }
}
