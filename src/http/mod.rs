//! HTTP plumbing: request descriptors, the authenticated pipeline and its errors.

mod descriptor;
mod error;
mod pipeline;

use serde::de::DeserializeOwned;

pub use descriptor::{
    FieldContent, GraphqlRequest, MultipartField, RequestBody, RequestDescriptor, ResponseFormat,
};
pub use error::ApiError;
pub use pipeline::{Payload, Pipeline, user_agent};

impl Pipeline {
    /// Run a GraphQL operation against the configured endpoint and decode its
    /// `data` field.
    pub async fn graphql<T: DeserializeOwned>(&self, request: &GraphqlRequest) -> Result<T, ApiError> {
        let descriptor = RequestDescriptor::graphql(self.graphql_path(), request)?;
        self.send(&descriptor).await?.decode()
    }
}
