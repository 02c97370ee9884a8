//! Error types for fetching GitHub data and exporting reports.

use http::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// The request never produced a response (network, TLS, timeout).
    #[error("request for page {page} of {resource} failed")]
    Transport {
        resource: String,
        page: u32,
        #[source]
        source: octocrab::Error,
    },

    /// GitHub rejected the credentials or the token lacks access.
    #[error("GitHub refused access to page {page} of {resource} ({status}): {message}")]
    Unauthorized {
        resource: String,
        page: u32,
        status: StatusCode,
        message: String,
    },

    #[error("GitHub could not process the request for page {page} of {resource}: {message}")]
    UnprocessableEntity {
        resource: String,
        page: u32,
        message: String,
    },

    #[error("unexpected status {status} for page {page} of {resource}: {message}")]
    UnexpectedStatus {
        resource: String,
        page: u32,
        status: StatusCode,
        message: String,
    },

    #[error("malformed response body for page {page} of {resource}")]
    Decode {
        resource: String,
        page: u32,
        #[source]
        source: octocrab::Error,
    },

    #[error("failed to write report {}", path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// The page whose fetch failed, when the error came from the API.
    pub fn page(&self) -> Option<u32> {
        match self {
            Self::Transport { page, .. }
            | Self::Unauthorized { page, .. }
            | Self::UnprocessableEntity { page, .. }
            | Self::UnexpectedStatus { page, .. }
            | Self::Decode { page, .. } => Some(*page),
            Self::Export { .. } => None,
        }
    }
}
