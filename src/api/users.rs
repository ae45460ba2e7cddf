use blogwire_api_types::{RegisterPayload, RegisterResponse, User};
use serde::Deserialize;
use tracing::instrument;

use super::BlogClient;
use crate::http::{ApiError, GraphqlRequest, Payload, RequestDescriptor};

const ME_USER: &str = "query MeUser { meUser { id username email fullname } }";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MeUserData {
    me_user: Option<User>,
}

impl BlogClient {
    /// The user the stored access token belongs to.
    pub async fn me_user(&self) -> Result<User, ApiError> {
        let data: MeUserData = self.query(GraphqlRequest::new(ME_USER)).await?;
        data.me_user.ok_or(ApiError::NotFound("user"))
    }

    /// Create an account. A success status without a JSON body counts as a
    /// successful registration.
    #[instrument(skip_all, fields(email = %payload.email))]
    pub async fn register(&self, payload: &RegisterPayload) -> Result<RegisterResponse, ApiError> {
        let descriptor = RequestDescriptor::post(self.register_path.as_str()).with_json(payload)?;
        match self.pipeline.send(&descriptor).await? {
            Payload::Text(_) => Ok(RegisterResponse {
                success: true,
                user: None,
            }),
            json => json.decode(),
        }
    }
}
