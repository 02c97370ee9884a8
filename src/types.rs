use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A unique identifier for a GitHub repository.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RepoId {
    /// The owner of the repository (e.g., "actions").
    pub owner: String,
    /// The name of the repository (e.g., "checkout").
    pub repo: String,
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid repository \"{0}\": expected owner/repo or a GitHub URL")]
pub struct RepoIdParseError(pub String);

impl FromStr for RepoId {
    type Err = RepoIdParseError;

    /// Accepts `owner/repo` or a URL such as `https://github.com/owner/repo/pulls`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let path = match trimmed.split_once("://") {
            // Skip the host segment.
            Some((_, rest)) => rest.split_once('/').map_or("", |(_, path)| path),
            None => trimmed,
        };

        let mut segments = path.split('/').filter(|segment| !segment.is_empty());
        match (segments.next(), segments.next()) {
            (Some(owner), Some(repo)) => {
                let repo = repo.strip_suffix(".git").unwrap_or(repo);
                if repo.is_empty() || (!trimmed.contains("://") && segments.next().is_some()) {
                    return Err(RepoIdParseError(s.to_string()));
                }
                Ok(Self {
                    owner: owner.to_string(),
                    repo: repo.to_string(),
                })
            }
            _ => Err(RepoIdParseError(s.to_string())),
        }
    }
}

/// Pull-request state filter passed to the GitHub list endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum StateFilter {
    #[default]
    All,
    Open,
    Closed,
}

impl StateFilter {
    pub fn as_query(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for StateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query())
    }
}

/// Restricts aggregation to pull requests opened by one account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActorFilter {
    Any,
    Login(String),
}

impl ActorFilter {
    pub const DEPENDABOT: &'static str = "dependabot[bot]";

    pub fn matches(&self, login: Option<&str>) -> bool {
        match self {
            Self::Any => true,
            Self::Login(expected) => {
                login.is_some_and(|login| login.eq_ignore_ascii_case(expected))
            }
        }
    }
}

impl Default for ActorFilter {
    fn default() -> Self {
        Self::Login(Self::DEPENDABOT.to_string())
    }
}

impl FromStr for ActorFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s == "*" {
            Ok(Self::Any)
        } else {
            Ok(Self::Login(s.to_string()))
        }
    }
}

impl fmt::Display for ActorFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("*"),
            Self::Login(login) => f.write_str(login),
        }
    }
}
