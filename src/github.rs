use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::fetcher::{self, Page, PER_PAGE};
use crate::types::{RepoId, StateFilter};
use anyhow::Context;
use chrono::{DateTime, Utc};
use http::{StatusCode, Uri};
use octocrab::service::middleware::retry::RetryConfig;
use octocrab::{FromResponse, Octocrab};
use serde::de::DeserializeOwned;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct GitHubUser {
    pub login: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GitHubRepo {
    pub name: String,
    pub full_name: String,
    pub owner: GitHubUser,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub watchers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub open_issues_count: u64,
    #[serde(default)]
    pub size: u64,
}

impl GitHubRepo {
    pub fn id(&self) -> RepoId {
        RepoId {
            owner: self.owner.login.clone(),
            repo: self.name.clone(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PRState {
    Open,
    Closed,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GitHubPR {
    pub id: u64,
    pub number: u64,
    pub state: PRState,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub merged_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user: Option<GitHubUser>,
}

impl GitHubPR {
    pub fn author(&self) -> Option<&str> {
        self.user.as_ref().map(|user| user.login.as_str())
    }
}

/// Body GitHub attaches to error responses.
#[derive(Debug, Deserialize)]
struct GitHubErrorBody {
    message: String,
}

/// Thin wrapper over `octocrab` exposing one call per page of each list endpoint.
#[derive(Clone)]
pub struct GitHubClient {
    octocrab: Octocrab,
}

impl GitHubClient {
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let octocrab = Octocrab::builder()
            .personal_token(config.github_token.clone())
            .base_uri(config.github_api_url.as_str())
            .with_context(|| format!("invalid GitHub API URL {}", config.github_api_url))?
            .set_connect_timeout(Some(config.request_timeout()))
            .set_read_timeout(Some(config.request_timeout()))
            // A failed page ends the run; never replay it.
            .add_retry_config(RetryConfig::None)
            .build()
            .context("building octocrab instance")?;

        Ok(Self { octocrab })
    }

    /// Fetches one page of the repositories owned by `org`.
    pub async fn org_repos_page(&self, org: &str, page: u32) -> Result<Page<GitHubRepo>> {
        let org = sanitize(org);
        let route = format!("/orgs/{org}/repos?per_page={PER_PAGE}&page={page}");
        self.get_page(&route, &format!("repositories of {org}"), page).await
    }

    /// Fetches one page of the pull requests of `repo_id` in the given state.
    pub async fn pulls_page(
        &self,
        repo_id: &RepoId,
        state: StateFilter,
        page: u32,
    ) -> Result<Page<GitHubPR>> {
        let owner = sanitize(&repo_id.owner);
        let repo = sanitize(&repo_id.repo);
        let route = format!(
            "/repos/{owner}/{repo}/pulls?state={}&per_page={PER_PAGE}&page={page}",
            state.as_query()
        );
        self.get_page(&route, &format!("pull requests of {repo_id}"), page).await
    }

    /// Every repository of `org`.
    pub async fn list_org_repos(&self, org: &str) -> Result<Vec<GitHubRepo>> {
        fetcher::fetch_all(move |page| self.org_repos_page(org, page)).await
    }

    /// Every pull request of `repo_id` in the given state.
    pub async fn list_pulls(
        &self,
        repo_id: &RepoId,
        state: StateFilter,
    ) -> Result<Vec<GitHubPR>> {
        fetcher::fetch_all(move |page| self.pulls_page(repo_id, state, page)).await
    }

    /// Fetches a single repository.
    pub async fn get_repo(&self, repo_id: &RepoId) -> Result<GitHubRepo> {
        let owner = sanitize(&repo_id.owner);
        let repo = sanitize(&repo_id.repo);
        let route = format!("/repos/{owner}/{repo}");
        let resource = format!("repository {repo_id}");
        let fetched = self.fetch(&route, &resource, 1).await?;
        fetched.ok_or_else(|| Error::UnexpectedStatus {
            resource,
            page: 1,
            status: StatusCode::NOT_MODIFIED,
            message: "no repository in a 304 response".to_string(),
        })
    }

    async fn get_page<T>(&self, route: &str, resource: &str, page: u32) -> Result<Page<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let Some(response) = self.fetch::<octocrab::Page<T>>(route, resource, page).await? else {
            return Ok(Page::empty());
        };

        Ok(Page {
            next_page: response.next.as_ref().and_then(page_number),
            items: response.items,
        })
    }

    /// Issues one GET and decodes a successful body. `None` means 304 Not Modified.
    async fn fetch<R: FromResponse>(
        &self,
        route: &str,
        resource: &str,
        page: u32,
    ) -> Result<Option<R>> {
        let transport = |source: octocrab::Error| Error::Transport {
            resource: resource.to_string(),
            page,
            source,
        };

        let response = self.octocrab._get(route).await.map_err(transport)?;
        let status = response.status();

        if status == StatusCode::NOT_MODIFIED {
            tracing::debug!(resource, page, "Not modified, treating page as empty");
            return Ok(None);
        }
        if !status.is_success() {
            let body = self
                .octocrab
                .body_to_string(response)
                .await
                .map_err(transport)?;
            return Err(status_error(status, &body, resource, page));
        }

        R::from_response(response)
            .await
            .map(Some)
            .map_err(|source| Error::Decode {
                resource: resource.to_string(),
                page,
                source,
            })
    }
}

/// Maps a non-success status to the matching error kind.
fn status_error(status: StatusCode, body: &str, resource: &str, page: u32) -> Error {
    let message = serde_json::from_str::<GitHubErrorBody>(body)
        .map(|error| error.message)
        .unwrap_or_else(|_| body.trim().to_string());
    let resource = resource.to_string();

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::Unauthorized {
            resource,
            page,
            status,
            message,
        },
        StatusCode::UNPROCESSABLE_ENTITY => Error::UnprocessableEntity {
            resource,
            page,
            message,
        },
        _ => Error::UnexpectedStatus {
            resource,
            page,
            status,
            message,
        },
    }
}

/// The `page` query parameter of a pagination link.
fn page_number(uri: &Uri) -> Option<u32> {
    uri.query()?
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "page")
        .and_then(|(_, value)| value.parse().ok())
}

// Keep caller-supplied names from reaching unintended endpoints.
fn sanitize(segment: &str) -> String {
    segment.trim().replace("..", "").replace(['/', '?', '#'], "")
}
