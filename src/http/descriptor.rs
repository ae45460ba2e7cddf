//! Immutable description of an outgoing call.
//!
//! A descriptor carries everything needed to issue a request except the
//! bearer credential, which the pipeline attaches at dispatch time. This is
//! what lets a rejected request be replayed verbatim after a token refresh.

use bytes::Bytes;
use reqwest::{
    Method,
    header::{HeaderName, HeaderValue},
    multipart::{Form, Part},
};
use serde::Serialize;

use super::error::ApiError;

/// How a response body is classified into success or failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    /// `{data, errors}` envelope; an `errors` array marks failure.
    Graphql,
    /// JSON or plain text depending on `Content-Type`.
    Rest,
}

#[derive(Debug, Clone)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Multipart(Vec<MultipartField>),
}

#[derive(Debug, Clone)]
pub struct MultipartField {
    pub name: String,
    pub content: FieldContent,
}

#[derive(Debug, Clone)]
pub enum FieldContent {
    Text(String),
    File {
        bytes: Bytes,
        file_name: String,
        mime: String,
    },
}

impl MultipartField {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: FieldContent::Text(value.into()),
        }
    }

    pub fn file(
        name: impl Into<String>,
        bytes: Bytes,
        file_name: impl Into<String>,
        mime: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            content: FieldContent::File {
                bytes,
                file_name: file_name.into(),
                mime: mime.into(),
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    method: Method,
    path: String,
    headers: Vec<(HeaderName, HeaderValue)>,
    body: RequestBody,
    format: ResponseFormat,
}

impl RequestDescriptor {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Vec::new(),
            body: RequestBody::Empty,
            format: ResponseFormat::Rest,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// A GraphQL operation posted as `{query, variables}`.
    pub fn graphql(path: impl Into<String>, request: &GraphqlRequest) -> Result<Self, ApiError> {
        let body = serde_json::to_value(request).map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        Ok(Self {
            body: RequestBody::Json(body),
            format: ResponseFormat::Graphql,
            ..Self::post(path)
        })
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.push((name, value));
        self
    }

    pub fn with_json<T: Serialize>(mut self, body: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body).map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    pub fn with_multipart(mut self, fields: Vec<MultipartField>) -> Self {
        self.body = RequestBody::Multipart(fields);
        self
    }

    pub fn with_format(mut self, format: ResponseFormat) -> Self {
        self.format = format;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn headers(&self) -> &[(HeaderName, HeaderValue)] {
        &self.headers
    }

    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    pub fn format(&self) -> ResponseFormat {
        self.format
    }
}

/// GraphQL request document.
#[derive(Debug, Clone, Serialize)]
pub struct GraphqlRequest {
    pub query: String,
    pub variables: serde_json::Map<String, serde_json::Value>,
}

impl GraphqlRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            variables: serde_json::Map::new(),
        }
    }

    pub fn variable<T: Serialize>(mut self, name: &str, value: T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(value).map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        self.variables.insert(name.to_string(), value);
        Ok(self)
    }
}

/// Build a fresh multipart form; forms are single-use, so a retry rebuilds it.
pub(crate) fn build_form(fields: &[MultipartField]) -> Result<Form, ApiError> {
    let mut form = Form::new();
    for field in fields {
        form = match &field.content {
            FieldContent::Text(value) => form.text(field.name.clone(), value.clone()),
            FieldContent::File {
                bytes,
                file_name,
                mime,
            } => {
                let part = Part::stream_with_length(bytes.clone(), bytes.len() as u64)
                    .file_name(file_name.clone())
                    .mime_str(mime)?;
                form.part(field.name.clone(), part)
            }
        };
    }
    Ok(form)
}
