//! Service layer for collecting organization-wide metrics.
//!
//! `MetricsQuerier` drives a run end to end:
//! 1. Listing every repository of the organization.
//! 2. Listing the pull requests of each repository, one repository at a time.
//! 3. Keeping only the pull requests opened by the requested actor.
//! 4. Reducing them to per-repository lifecycle statistics.

use crate::config::AppConfig;
use crate::error::Result;
use crate::export::{Report, RepositoryReport};
use crate::github::{GitHubClient, GitHubRepo};
use crate::metrics;
use crate::types::{ActorFilter, RepoId, StateFilter};
use chrono::{DateTime, Utc};

/// Which pull requests feed the statistics.
#[derive(Clone, Debug, Default)]
pub struct PullRequestFilter {
    pub state: StateFilter,
    pub actor: ActorFilter,
}

/// Which CSV report a run produces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportKind {
    /// Pull-request lifecycle statistics per repository.
    #[default]
    PullRequests,
    /// Repository attributes only (stars, forks, ...).
    Repositories,
}

#[derive(Clone)]
pub struct MetricsQuerier {
    client: GitHubClient,
}

impl MetricsQuerier {
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        Ok(Self::with_client(GitHubClient::new(config)?))
    }

    pub fn with_client(client: GitHubClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &GitHubClient {
        &self.client
    }

    /// Builds the requested report for every repository of `org`.
    ///
    /// Nothing is returned unless every page of every listing was fetched.
    pub async fn collect(
        &self,
        org: &str,
        kind: ReportKind,
        filter: &PullRequestFilter,
        now: DateTime<Utc>,
    ) -> Result<Report> {
        let repos = self.repositories(org).await?;

        match kind {
            ReportKind::Repositories => Ok(Report::Repositories(repos)),
            ReportKind::PullRequests => {
                let mut rows = Vec::with_capacity(repos.len());
                for repo in &repos {
                    rows.push(self.repository_report(repo.id(), filter, now).await?);
                }
                Ok(Report::PullRequests(rows))
            }
        }
    }

    /// Lists every repository of `org`.
    pub async fn repositories(&self, org: &str) -> Result<Vec<GitHubRepo>> {
        let repos = self.client.list_org_repos(org).await?;
        tracing::info!(org, count = repos.len(), "Listed repositories");
        Ok(repos)
    }

    /// Fetches the pull requests of one repository and reduces them to statistics.
    pub async fn repository_report(
        &self,
        repo_id: RepoId,
        filter: &PullRequestFilter,
        now: DateTime<Utc>,
    ) -> Result<RepositoryReport> {
        let mut prs = self.client.list_pulls(&repo_id, filter.state).await?;
        let fetched = prs.len();
        prs.retain(|pr| filter.actor.matches(pr.author()));

        let stats = metrics::calculate_stats(&prs, now);
        tracing::info!(
            repo_id = %repo_id,
            fetched,
            matched = prs.len(),
            merged = stats.merged,
            closed = stats.closed,
            open = stats.open,
            "Calculated pull request stats"
        );

        Ok(RepositoryReport {
            repo: repo_id,
            stats,
        })
    }
}
