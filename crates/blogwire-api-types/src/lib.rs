//! Request and response shapes shared by the blogwire client and its CLI.
//!
//! Types mirror the GraphQL schema of the blogging backend closely enough to
//! deserialize its nodes directly; collection fields arrive as cursor
//! connections (`edges[].node`) and are flattened by [`Connection::into_nodes`].

use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

pub mod iri;

pub use iri::{id_from_iri, resource_iri};

/// Cursor connection as returned for collection fields.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Connection<T> {
    #[serde(default = "Vec::new")]
    pub edges: Vec<Edge<T>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Edge<T> {
    pub node: T,
}

impl<T> Connection<T> {
    pub fn into_nodes(self) -> Vec<T> {
        self.edges.into_iter().map(|edge| edge.node).collect()
    }
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self { edges: Vec::new() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<String>,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub fullname: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Blog {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscribed: Option<bool>,
    /// Roles the current user holds on this blog.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
}

/// A blog together with the posts it contains.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BlogDetail {
    #[serde(flatten)]
    pub blog: Blog,
    #[serde(default)]
    pub posts: Vec<Post>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BlogSummary {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

/// A post together with the blog it belongs to and its author.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: Post,
    #[serde(default)]
    pub blog: Option<BlogSummary>,
    #[serde(default)]
    pub author: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Subscription {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub legacy_id: Option<i64>,
}

/// Server-suggested blog fields.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BlogDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Server-suggested post fields.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PostDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Clone, Deserialize, Serialize)]
pub struct LoginPayload {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for LoginPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginPayload")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, Deserialize, Serialize)]
pub struct RegisterPayload {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl fmt::Debug for RegisterPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterPayload")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<serde_json::Value>,
}

/// Token pair issued by the login and token-refresh endpoints.
///
/// Both fields are optional on the wire so that a response without a token
/// can be told apart from a malformed one.
#[derive(Clone, Default, Deserialize, Serialize)]
pub struct TokenPair {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default, alias = "refreshToken")]
    pub refresh_token: Option<String>,
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateBlogInput {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteBlogInput {
    pub id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatePostInput {
    pub title: String,
    pub content: String,
    /// Blog IRI, e.g. `/api/blogs/3`.
    pub blog: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdatePostInput {
    /// Post IRI, e.g. `/api/posts/12`.
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentInput {
    pub content: String,
    pub post_id: i64,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionInput {
    pub blog_id: i64,
}
