//! blogwire: client for a GraphQL blogging API.
//!
//! Every call goes through [`http::Pipeline`], which attaches the stored bearer
//! token, refreshes it once on `401 Unauthorized`, and retries the original
//! request exactly once.

pub mod api;
pub mod auth;
pub mod config;
pub mod http;
pub mod infra;

pub use api::BlogClient;
pub use auth::{FileTokenStore, MemoryTokenStore, StoreError, TokenStore};
pub use http::{ApiError, Payload, Pipeline, RequestDescriptor};
