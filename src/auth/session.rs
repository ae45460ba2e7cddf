use blogwire_api_types::{LoginPayload, TokenPair};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::http::{ApiError, Pipeline};

const LOGIN_FAILED: &str = "Login failed";
const NO_TOKEN_RECEIVED: &str = "No token received";

#[derive(Debug, Default, Deserialize)]
struct LoginError {
    #[serde(default)]
    message: Option<String>,
}

/// Login/logout against the JWT login endpoint.
///
/// Logging in replaces whatever tokens the store held; the refresh token is
/// only overwritten when the server issues one.
#[derive(Debug, Clone)]
pub struct Session {
    pipeline: Pipeline,
    login_path: String,
}

impl Session {
    pub fn new(pipeline: Pipeline, login_path: impl Into<String>) -> Self {
        Self {
            pipeline,
            login_path: login_path.into(),
        }
    }

    #[instrument(skip_all, fields(username = %payload.username))]
    pub async fn login(&self, payload: &LoginPayload) -> Result<TokenPair, ApiError> {
        let (status, body) = self.pipeline.post_anonymous(&self.login_path, payload).await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<LoginError>(&body)
                .ok()
                .and_then(|e| e.message)
                .unwrap_or_else(|| LOGIN_FAILED.to_string());
            return Err(ApiError::request_failed(Some(status), message));
        }

        let pair: TokenPair = serde_json::from_slice(&body).map_err(ApiError::decode)?;
        let Some(token) = pair.token.as_deref().filter(|t| !t.is_empty()) else {
            return Err(ApiError::request_failed(Some(status), NO_TOKEN_RECEIVED));
        };

        let store = self.pipeline.store();
        store.set_access_token(token).await?;
        if let Some(refresh) = pair.refresh_token.as_deref().filter(|t| !t.is_empty()) {
            store.set_refresh_token(refresh).await?;
        }
        info!(has_refresh_token = pair.refresh_token.is_some(), "logged in");
        Ok(pair)
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        self.pipeline.store().clear().await?;
        info!("logged out");
        Ok(())
    }

    /// Whether an access token is currently stored. Validity is only known
    /// once the server accepts or rejects it.
    pub async fn is_authenticated(&self) -> Result<bool, ApiError> {
        Ok(self.pipeline.store().access_token().await?.is_some())
    }
}
