//! Application configuration and environment variable parsing.
//!
//! Settings come from the environment, optionally seeded from a `.env` file by the binary.
//! `AppConfig` carries the GitHub credentials and the knobs of the HTTP client.

use serde::Deserialize;
use std::time::Duration as StdDuration;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Application configuration loaded from environment variables.
#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    /// GitHub personal access token used for every request.
    #[serde(alias = "access_token")]
    pub github_token: String,

    /// Base URI of the GitHub REST API. Point it at a GitHub Enterprise
    /// instance (`https://ghe.example.com/api/v3`) or a local mock.
    #[serde(default = "default_api_url")]
    pub github_api_url: String,

    /// Connect and read timeout applied to each request, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_request_timeout() -> u64 {
    10
}

impl AppConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }

    pub fn new(github_token: impl Into<String>) -> Self {
        Self {
            github_token: github_token.into(),
            github_api_url: default_api_url(),
            request_timeout_seconds: default_request_timeout(),
        }
    }

    pub fn request_timeout(&self) -> StdDuration {
        StdDuration::from_secs(self.request_timeout_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    fn clear_env() {
        env::remove_var("GITHUB_TOKEN");
        env::remove_var("ACCESS_TOKEN");
        env::remove_var("GITHUB_API_URL");
        env::remove_var("REQUEST_TIMEOUT_SECONDS");
    }

    #[test]
    #[serial]
    fn test_config_from_env() {
        clear_env();
        env::set_var("GITHUB_TOKEN", "ghp_test");
        env::set_var("GITHUB_API_URL", "https://ghe.example.com/api/v3");
        env::set_var("REQUEST_TIMEOUT_SECONDS", "30");

        let config = AppConfig::from_env().expect("Failed to load config");

        assert_eq!(config.github_token, "ghp_test");
        assert_eq!(config.github_api_url, "https://ghe.example.com/api/v3");
        assert_eq!(config.request_timeout(), StdDuration::from_secs(30));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_config_defaults() {
        clear_env();
        env::set_var("ACCESS_TOKEN", "ghp_alias");

        let config = AppConfig::from_env().expect("Failed to load config");

        assert_eq!(config.github_token, "ghp_alias");
        assert_eq!(config.github_api_url, DEFAULT_API_URL);
        assert_eq!(config.request_timeout_seconds, 10);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_config_missing_token() {
        clear_env();
        let result = AppConfig::from_env();
        assert!(result.is_err());
    }
}
