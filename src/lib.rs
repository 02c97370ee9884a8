pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod fetcher;
pub mod github;
pub mod metrics;
pub mod querier;
pub mod types;

use anyhow::Context;
use chrono::{DateTime, Local, Utc};
use cli::{Cli, Commands, DependabotArgs};
use config::AppConfig;
use querier::{MetricsQuerier, PullRequestFilter};
use std::path::PathBuf;
use types::RepoId;

pub use error::{Error, Result};

/// Executes one CLI command against the GitHub API described by `config`.
pub async fn run(cli: Cli, config: &AppConfig) -> anyhow::Result<()> {
    let querier = MetricsQuerier::new(config)?;

    match cli.command {
        Commands::Dependabot(args) => {
            let path = export_metrics(&querier, &args, Utc::now()).await?;
            println!("{}", path.display());
        }
        Commands::Repo { repository } => show_repository(&querier, &repository).await?,
    }

    Ok(())
}

/// Collects the report selected by `args` and writes it to `repos-<date>.csv`.
///
/// No file is created when any fetch fails.
pub async fn export_metrics(
    querier: &MetricsQuerier,
    args: &DependabotArgs,
    now: DateTime<Utc>,
) -> anyhow::Result<PathBuf> {
    let filter = PullRequestFilter {
        state: args.state,
        actor: args.actor.clone(),
    };
    tracing::info!(
        org = %args.org,
        actor = %filter.actor,
        state = %filter.state,
        report = ?args.report,
        "Collecting metrics"
    );

    let report = querier
        .collect(&args.org, args.report, &filter, now)
        .await
        .with_context(|| format!("collecting metrics for organization {}", args.org))?;

    let date = now.with_timezone(&Local).date_naive();
    let path = report.write_to_dir(&args.output_dir, date)?;
    tracing::info!(path = %path.display(), rows = report.len(), "Wrote report");

    Ok(path)
}

async fn show_repository(querier: &MetricsQuerier, repo_id: &RepoId) -> anyhow::Result<()> {
    let repo = querier
        .client()
        .get_repo(repo_id)
        .await
        .with_context(|| format!("fetching repository {repo_id}"))?;

    println!("Repository: {}", repo.full_name);
    println!("Stars:      {}", repo.stargazers_count);
    println!("Watchers:   {}", repo.watchers_count);
    println!("Forks:      {}", repo.forks_count);
    println!("OpenIssues: {}", repo.open_issues_count);
    println!("Size:       {}", repo.size);

    Ok(())
}
