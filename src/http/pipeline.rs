//! Authenticated request pipeline.
//!
//! `send` runs a three-state protocol per call:
//!
//! ```text
//! Initial --401--> Refreshing --new token--> Retried --> outcome
//!    |                  |
//!    +--> outcome       +--> AuthenticationRequired
//! ```
//!
//! `Retried` only ever yields a final outcome, so a 401 on the replayed call
//! can never start a second refresh. Independent calls do not coordinate: two
//! overlapping calls that both see a 401 each refresh, and the later write to
//! the token store wins.

use std::sync::Arc;

use bytes::Bytes;
use metrics::counter;
use reqwest::{
    Client, Response, StatusCode, Url,
    header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::{Instrument, debug, info_span, warn};

use blogwire_api_types::TokenPair;

use super::descriptor::{RequestBody, RequestDescriptor, ResponseFormat, build_form};
use super::error::{
    ApiError, GRAPHQL_FAILED, GRAPHQL_FAILED_AFTER_REFRESH, REQUEST_FAILED,
    REQUEST_FAILED_AFTER_REFRESH,
};
use crate::auth::TokenStore;
use crate::config::ApiSettings;
use crate::infra::telemetry::{
    METRIC_REFRESH_FAILED_TOTAL, METRIC_REFRESH_TOTAL, METRIC_REQUESTS_TOTAL,
};

/// Decoded success body.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(serde_json::Value),
    Text(String),
}

impl Payload {
    pub fn into_json(self) -> serde_json::Value {
        match self {
            Self::Json(value) => value,
            Self::Text(text) => serde_json::Value::String(text),
        }
    }

    pub fn decode<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        serde_json::from_value(self.into_json()).map_err(ApiError::decode)
    }
}

/// Where a call stands in the refresh protocol.
enum Phase {
    Initial,
    Refreshing,
    Retried { access_token: String },
}

#[derive(Debug, Default, Deserialize)]
struct GraphqlEnvelope {
    #[serde(default)]
    data: Option<serde_json::Value>,
    #[serde(default)]
    errors: Option<Vec<GraphqlErrorEntry>>,
}

#[derive(Debug, Deserialize)]
struct GraphqlErrorEntry {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct MessageBody {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

/// Why a refresh exchange did not produce a usable token.
#[derive(Debug, Error)]
enum RefreshFailure {
    #[error("no refresh token stored")]
    NoRefreshToken,
    #[error("refresh rejected with status {status}: {message}")]
    Rejected { status: StatusCode, message: String },
    #[error("no token received from refresh")]
    MissingToken,
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Clone)]
pub struct Pipeline {
    client: Client,
    base: Url,
    graphql_path: String,
    refresh_path: String,
    store: Arc<dyn TokenStore>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("base", &self.base.as_str())
            .field("graphql_path", &self.graphql_path)
            .field("refresh_path", &self.refresh_path)
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    pub fn new(settings: &ApiSettings, store: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let client = Client::builder().user_agent(user_agent()).build()?;
        Ok(Self::with_client(client, settings, store))
    }

    pub fn with_client(client: Client, settings: &ApiSettings, store: Arc<dyn TokenStore>) -> Self {
        Self {
            client,
            base: settings.base_url.clone(),
            graphql_path: settings.graphql_path.clone(),
            refresh_path: settings.refresh_path.clone(),
            store,
        }
    }

    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn graphql_path(&self) -> &str {
        &self.graphql_path
    }

    pub fn url(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base.join(path.trim_start_matches('/'))?)
    }

    /// Issue `descriptor` with the stored bearer token, refreshing and
    /// replaying it once if the server answers `401 Unauthorized`.
    pub async fn send(&self, descriptor: &RequestDescriptor) -> Result<Payload, ApiError> {
        let span = info_span!(
            "api.send",
            method = %descriptor.method(),
            path = descriptor.path(),
        );
        self.run(descriptor).instrument(span).await
    }

    async fn run(&self, descriptor: &RequestDescriptor) -> Result<Payload, ApiError> {
        let mut phase = Phase::Initial;
        loop {
            phase = match phase {
                Phase::Initial => {
                    let token = self.store.access_token().await?;
                    let response = self.dispatch(descriptor, token.as_deref()).await?;
                    if response.status() == StatusCode::UNAUTHORIZED {
                        debug!(had_token = token.is_some(), "request unauthorized");
                        Phase::Refreshing
                    } else {
                        return classify(descriptor.format(), response, false).await;
                    }
                }
                Phase::Refreshing => Phase::Retried {
                    access_token: self.refresh_access_token().await?,
                },
                Phase::Retried { access_token } => {
                    debug!("replaying request with refreshed token");
                    let response = self.dispatch(descriptor, Some(&access_token)).await?;
                    return classify(descriptor.format(), response, true).await;
                }
            };
        }
    }

    async fn dispatch(
        &self,
        descriptor: &RequestDescriptor,
        access_token: Option<&str>,
    ) -> Result<Response, ApiError> {
        let url = self.url(descriptor.path())?;
        let mut request = self.client.request(descriptor.method().clone(), url);
        for (name, value) in descriptor.headers() {
            request = request.header(name.clone(), value.clone());
        }
        if let Some(token) = access_token {
            request = request.header(AUTHORIZATION, bearer(token)?);
        }
        request = match descriptor.body() {
            RequestBody::Empty => request,
            RequestBody::Json(body) => request.json(body),
            RequestBody::Multipart(fields) => request.multipart(build_form(fields)?),
        };

        counter!(METRIC_REQUESTS_TOTAL).increment(1);
        let response = request.send().await?;
        debug!(status = response.status().as_u16(), "response received");
        Ok(response)
    }

    /// Obtain a new access token with the stored refresh token.
    ///
    /// Every failure clears both stored tokens and surfaces as
    /// [`ApiError::AuthenticationRequired`].
    async fn refresh_access_token(&self) -> Result<String, ApiError> {
        counter!(METRIC_REFRESH_TOTAL).increment(1);
        let span = info_span!("api.refresh", path = %self.refresh_path);
        match self.exchange_refresh_token().instrument(span).await {
            Ok(token) => Ok(token),
            Err(failure) => {
                counter!(METRIC_REFRESH_FAILED_TOTAL).increment(1);
                warn!(reason = %failure, "token refresh failed, clearing stored credentials");
                if let Err(err) = self.store.clear().await {
                    warn!(error = %err, "failed to clear token store");
                }
                Err(ApiError::AuthenticationRequired)
            }
        }
    }

    async fn exchange_refresh_token(&self) -> Result<String, RefreshFailure> {
        let refresh_token = self
            .store
            .refresh_token()
            .await
            .map_err(ApiError::from)?
            .ok_or(RefreshFailure::NoRefreshToken)?;

        let (status, body) = self
            .post_anonymous(
                &self.refresh_path,
                &RefreshRequest {
                    refresh_token: &refresh_token,
                },
            )
            .await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<MessageBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| "Token refresh failed".to_string());
            return Err(RefreshFailure::Rejected { status, message });
        }

        let pair: TokenPair = serde_json::from_slice(&body).map_err(ApiError::decode)?;
        let token = pair
            .token
            .filter(|t| !t.is_empty())
            .ok_or(RefreshFailure::MissingToken)?;

        self.store
            .set_access_token(&token)
            .await
            .map_err(ApiError::from)?;
        if let Some(refresh) = pair.refresh_token.filter(|t| !t.is_empty()) {
            self.store
                .set_refresh_token(&refresh)
                .await
                .map_err(ApiError::from)?;
        }
        debug!("access token refreshed");
        Ok(token)
    }

    /// POST a JSON body without a bearer token and without refresh handling.
    pub(crate) async fn post_anonymous<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(StatusCode, Bytes), ApiError> {
        let url = self.url(path)?;
        counter!(METRIC_REQUESTS_TOTAL).increment(1);
        let response = self.client.post(url).json(body).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        Ok((status, bytes))
    }
}

pub fn user_agent() -> &'static str {
    concat!("blogwire/", env!("CARGO_PKG_VERSION"))
}

fn bearer(token: &str) -> Result<HeaderValue, ApiError> {
    let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
        .map_err(|e| ApiError::InvalidRequest(format!("access token is not a valid header: {e}")))?;
    value.set_sensitive(true);
    Ok(value)
}

async fn classify(
    format: ResponseFormat,
    response: Response,
    retried: bool,
) -> Result<Payload, ApiError> {
    let status = response.status();
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"));
    let body = response.bytes().await?;

    match format {
        ResponseFormat::Graphql => classify_graphql(status, &body, retried),
        ResponseFormat::Rest => classify_rest(status, is_json, &body, retried),
    }
}

pub(crate) fn classify_graphql(
    status: StatusCode,
    body: &[u8],
    retried: bool,
) -> Result<Payload, ApiError> {
    let fallback = if retried {
        GRAPHQL_FAILED_AFTER_REFRESH
    } else {
        GRAPHQL_FAILED
    };

    let envelope: GraphqlEnvelope = match serde_json::from_slice(body) {
        Ok(envelope) => envelope,
        Err(err) => {
            debug!(error = %err, "graphql response is not JSON");
            return Err(ApiError::request_failed(Some(status), fallback));
        }
    };

    if let Some(errors) = envelope.errors {
        let message = errors
            .into_iter()
            .next()
            .and_then(|e| e.message)
            .unwrap_or_else(|| fallback.to_string());
        return Err(ApiError::request_failed(Some(status), message));
    }
    if !status.is_success() {
        return Err(ApiError::request_failed(Some(status), fallback));
    }

    Ok(Payload::Json(envelope.data.unwrap_or(serde_json::Value::Null)))
}

pub(crate) fn classify_rest(
    status: StatusCode,
    is_json: bool,
    body: &[u8],
    retried: bool,
) -> Result<Payload, ApiError> {
    let fallback = if retried {
        REQUEST_FAILED_AFTER_REFRESH
    } else {
        REQUEST_FAILED
    };

    if is_json {
        let value: serde_json::Value = match serde_json::from_slice(body) {
            Ok(value) => value,
            Err(err) if status.is_success() => return Err(ApiError::decode(err)),
            Err(_) => return Err(ApiError::request_failed(Some(status), fallback)),
        };
        if !status.is_success() {
            let message = value
                .get("message")
                .and_then(serde_json::Value::as_str)
                .unwrap_or(fallback);
            return Err(ApiError::request_failed(Some(status), message));
        }
        return Ok(Payload::Json(value));
    }

    let text = String::from_utf8_lossy(body).into_owned();
    if !status.is_success() {
        let message = if text.trim().is_empty() {
            fallback.to_string()
        } else {
            text
        };
        return Err(ApiError::request_failed(Some(status), message));
    }
    Ok(Payload::Text(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure_message(result: Result<Payload, ApiError>) -> (Option<StatusCode>, String) {
        match result {
            Err(ApiError::RequestFailed { status, message }) => (status, message),
            other => panic!("expected RequestFailed, got {other:?}"),
        }
    }

    #[test]
    fn graphql_success_yields_data_field() {
        let payload = classify_graphql(
            StatusCode::OK,
            br#"{"data":{"meUser":{"id":"42"}}}"#,
            false,
        )
        .expect("success");
        assert_eq!(payload, Payload::Json(serde_json::json!({"meUser": {"id": "42"}})));
    }

    #[test]
    fn graphql_errors_array_fails_even_on_200() {
        let (status, message) = failure_message(classify_graphql(
            StatusCode::OK,
            br#"{"data":null,"errors":[{"message":"Access Denied."}]}"#,
            false,
        ));
        assert_eq!(status, Some(StatusCode::OK));
        assert_eq!(message, "Access Denied.");
    }

    #[test]
    fn graphql_empty_errors_array_uses_generic_message() {
        let (_, message) =
            failure_message(classify_graphql(StatusCode::OK, br#"{"errors":[]}"#, false));
        assert_eq!(message, GRAPHQL_FAILED);
    }

    #[test]
    fn graphql_non_json_failure_after_refresh_mentions_refresh() {
        let (status, message) = failure_message(classify_graphql(
            StatusCode::BAD_GATEWAY,
            b"<html>bad gateway</html>",
            true,
        ));
        assert_eq!(status, Some(StatusCode::BAD_GATEWAY));
        assert_eq!(message, GRAPHQL_FAILED_AFTER_REFRESH);
    }

    #[test]
    fn rest_json_failure_carries_server_message() {
        let (_, message) = failure_message(classify_rest(
            StatusCode::BAD_REQUEST,
            true,
            br#"{"message":"email already used"}"#,
            false,
        ));
        assert_eq!(message, "email already used");
    }

    #[test]
    fn rest_text_failure_uses_body_as_message() {
        let (_, message) = failure_message(classify_rest(
            StatusCode::INTERNAL_SERVER_ERROR,
            false,
            b"database offline",
            false,
        ));
        assert_eq!(message, "database offline");
    }

    #[test]
    fn rest_empty_text_failure_falls_back_to_generic() {
        let (_, message) =
            failure_message(classify_rest(StatusCode::NOT_FOUND, false, b"", true));
        assert_eq!(message, REQUEST_FAILED_AFTER_REFRESH);
    }

    #[test]
    fn rest_success_decodes_by_content_type() {
        let json = classify_rest(StatusCode::OK, true, br#"{"success":true}"#, false)
            .expect("json body");
        assert_eq!(json, Payload::Json(serde_json::json!({"success": true})));

        let text = classify_rest(StatusCode::OK, false, b"ok", false).expect("text body");
        assert_eq!(text, Payload::Text("ok".into()));
    }

    #[test]
    fn bearer_header_is_marked_sensitive() {
        let value = bearer("abc").expect("header");
        assert!(value.is_sensitive());
        assert_eq!(value.to_str().expect("ascii"), "Bearer abc");
    }

    #[test]
    fn bearer_rejects_control_characters() {
        assert!(matches!(bearer("a\nb"), Err(ApiError::InvalidRequest(_))));
    }
}
