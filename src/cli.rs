use crate::querier::ReportKind;
use crate::types::{ActorFilter, RepoId, StateFilter};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Gather pull-request metrics for the repositories of a GitHub organization.
#[derive(Parser, Debug)]
#[command(name = "github-metrics", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the organization's repositories and write per-repository pull-request
    /// stats to a CSV file
    Dependabot(DependabotArgs),

    /// Show a single repository (owner/repo or a GitHub URL)
    Repo { repository: RepoId },
}

#[derive(Args, Debug, Clone)]
pub struct DependabotArgs {
    /// The organization to list repositories for
    #[arg(short, long)]
    pub org: String,

    /// Only count pull requests opened by this account ("*" for anyone)
    #[arg(short, long, default_value = ActorFilter::DEPENDABOT)]
    pub actor: ActorFilter,

    /// The state to filter pull requests by
    #[arg(short, long, value_enum, default_value_t = StateFilter::All)]
    pub state: StateFilter,

    /// Which report to write
    #[arg(long, value_enum, default_value_t = ReportKind::PullRequests)]
    pub report: ReportKind,

    /// Directory the CSV file is written to
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependabot_defaults() {
        let cli =
            Cli::try_parse_from(["github-metrics", "dependabot", "--org", "actions"]).unwrap();
        let Commands::Dependabot(args) = cli.command else {
            panic!("expected dependabot command");
        };

        assert_eq!(args.org, "actions");
        assert_eq!(args.actor, ActorFilter::Login("dependabot[bot]".to_string()));
        assert_eq!(args.state, StateFilter::All);
        assert_eq!(args.report, ReportKind::PullRequests);
        assert_eq!(args.output_dir, PathBuf::from("."));
    }

    #[test]
    fn test_dependabot_overrides() {
        let cli = Cli::try_parse_from([
            "github-metrics",
            "dependabot",
            "-o",
            "rust-lang",
            "-a",
            "*",
            "-s",
            "closed",
            "--report",
            "repositories",
            "--output-dir",
            "/tmp/out",
        ])
        .unwrap();
        let Commands::Dependabot(args) = cli.command else {
            panic!("expected dependabot command");
        };

        assert_eq!(args.actor, ActorFilter::Any);
        assert_eq!(args.state, StateFilter::Closed);
        assert_eq!(args.report, ReportKind::Repositories);
        assert_eq!(args.output_dir, PathBuf::from("/tmp/out"));
    }

    #[test]
    fn test_org_is_required() {
        assert!(Cli::try_parse_from(["github-metrics", "dependabot"]).is_err());
    }

    #[test]
    fn test_repo_accepts_url() {
        let cli = Cli::try_parse_from([
            "github-metrics",
            "repo",
            "https://github.com/actions/checkout",
        ])
        .unwrap();
        let Commands::Repo { repository } = cli.command else {
            panic!("expected repo command");
        };
        assert_eq!(repository.to_string(), "actions/checkout");
    }

    #[test]
    fn test_repo_rejects_bare_name() {
        assert!(Cli::try_parse_from(["github-metrics", "repo", "checkout"]).is_err());
    }
}
