use blogwire_api_types::{Subscription, SubscriptionInput};
use serde::Deserialize;

use super::BlogClient;
use crate::http::{ApiError, GraphqlRequest};

const SUBSCRIBE: &str = r"mutation CreateSubscription($input: createSubscriptionInput!) {
  createSubscription(input: $input) { subscription { id } }
}";

const UNSUBSCRIBE: &str = r"mutation DeleteSubscription($input: deleteSubscriptionInput!) {
  deleteSubscription(input: $input) { subscription { _id } }
}";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubscribeData {
    create_subscription: SubscriptionPayload,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UnsubscribeData {
    delete_subscription: SubscriptionPayload,
}

#[derive(Deserialize)]
struct SubscriptionPayload {
    subscription: Option<Subscription>,
}

impl BlogClient {
    /// Follow a blog. The server resolves the subscriber from the token.
    pub async fn subscribe(&self, blog_id: i64) -> Result<Subscription, ApiError> {
        let request =
            GraphqlRequest::new(SUBSCRIBE).variable("input", SubscriptionInput { blog_id })?;
        let data: SubscribeData = self.query(request).await?;
        data.create_subscription
            .subscription
            .ok_or_else(|| ApiError::decode("createSubscription returned nothing"))
    }

    pub async fn unsubscribe(&self, blog_id: i64) -> Result<Subscription, ApiError> {
        let request =
            GraphqlRequest::new(UNSUBSCRIBE).variable("input", SubscriptionInput { blog_id })?;
        let data: UnsubscribeData = self.query(request).await?;
        data.delete_subscription
            .subscription
            .ok_or_else(|| ApiError::decode("deleteSubscription returned nothing"))
    }
}
