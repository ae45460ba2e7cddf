use reqwest::StatusCode;
use thiserror::Error;

use crate::auth::StoreError;

pub(crate) const GRAPHQL_FAILED: &str = "GraphQL request failed";
pub(crate) const GRAPHQL_FAILED_AFTER_REFRESH: &str = "GraphQL request failed after token refresh";
pub(crate) const REQUEST_FAILED: &str = "Request failed";
pub(crate) const REQUEST_FAILED_AFTER_REFRESH: &str = "Request failed after token refresh";

#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-success status or an error payload.
    #[error("{message}")]
    RequestFailed {
        status: Option<StatusCode>,
        message: String,
    },
    /// The access token was rejected and could not be refreshed; the stored
    /// credentials have been cleared.
    #[error("authentication failed, please log in again")]
    AuthenticationRequired,
    /// A lookup succeeded but returned no resource.
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error("token store error: {0}")]
    TokenStore(#[from] StoreError),
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    pub fn request_failed(status: Option<StatusCode>, message: impl Into<String>) -> Self {
        Self::RequestFailed {
            status,
            message: message.into(),
        }
    }

    pub fn decode(err: impl std::fmt::Display) -> Self {
        Self::Decode(err.to_string())
    }

    pub fn is_authentication_required(&self) -> bool {
        matches!(self, Self::AuthenticationRequired)
    }

    /// HTTP status attached to a `RequestFailed`, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::RequestFailed { status, .. } => *status,
            Self::Transport(err) => err.status(),
            _ => None,
        }
    }
}
