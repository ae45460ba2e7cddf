//! Typed operations over the blogging API.
//!
//! Identifiers returned by these methods are bare ids (`"12"`); the
//! backend's IRIs (`/api/posts/12`) are converted on the way in and out.

mod blogs;
mod comments;
mod posts;
mod subscriptions;
mod uploads;
mod users;

use std::sync::Arc;

use blogwire_api_types::{LoginPayload, TokenPair};
use serde::de::DeserializeOwned;

use crate::auth::{Session, TokenStore};
use crate::config::{ApiSettings, Settings};
use crate::http::{ApiError, GraphqlRequest, Pipeline};
use crate::infra::store::build_token_store;

#[derive(Debug, Clone)]
pub struct BlogClient {
    pipeline: Pipeline,
    session: Session,
    register_path: String,
}

impl BlogClient {
    pub fn new(settings: &ApiSettings, store: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let pipeline = Pipeline::new(settings, store)?;
        Ok(Self::with_pipeline(pipeline, settings))
    }

    /// Build a client and its token store from resolved settings.
    pub fn from_settings(settings: &Settings) -> Result<Self, ApiError> {
        Self::new(&settings.api, build_token_store(&settings.auth))
    }

    pub fn with_pipeline(pipeline: Pipeline, settings: &ApiSettings) -> Self {
        let session = Session::new(pipeline.clone(), settings.login_path.clone());
        Self {
            pipeline,
            session,
            register_path: settings.register_path.clone(),
        }
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub async fn login(&self, payload: &LoginPayload) -> Result<TokenPair, ApiError> {
        self.session.login(payload).await
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        self.session.logout().await
    }

    pub async fn is_authenticated(&self) -> Result<bool, ApiError> {
        self.session.is_authenticated().await
    }

    /// Run an arbitrary GraphQL document and return its raw `data`.
    pub async fn raw_graphql(&self, request: &GraphqlRequest) -> Result<serde_json::Value, ApiError> {
        self.pipeline.graphql(request).await
    }

    async fn query<T: DeserializeOwned>(&self, request: GraphqlRequest) -> Result<T, ApiError> {
        self.pipeline.graphql(&request).await
    }
}
