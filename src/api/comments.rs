use blogwire_api_types::{Comment, CreateCommentInput, id_from_iri, resource_iri};
use serde::Deserialize;

use super::BlogClient;
use crate::http::{ApiError, GraphqlRequest};

const CREATE_COMMENT: &str = r"mutation CreateComment($input: createCommentInput!) {
  createComment(input: $input) { comment { id content author createdAt updatedAt } }
}";

const GET_COMMENT: &str = r"query Comment($id: ID!) {
  comment(id: $id) { id content author createdAt updatedAt }
}";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateCommentData {
    create_comment: CommentPayload,
}

#[derive(Deserialize)]
struct CommentPayload {
    comment: Option<Comment>,
}

#[derive(Deserialize)]
struct CommentData {
    comment: Option<Comment>,
}

fn normalize(comment: Comment) -> Comment {
    Comment {
        id: id_from_iri(&comment.id).to_string(),
        ..comment
    }
}

impl BlogClient {
    pub async fn create_comment(&self, post_id: i64, content: &str) -> Result<Comment, ApiError> {
        let input = CreateCommentInput {
            content: content.to_string(),
            post_id,
        };
        let request = GraphqlRequest::new(CREATE_COMMENT).variable("input", &input)?;
        let data: CreateCommentData = self.query(request).await?;
        data.create_comment
            .comment
            .map(normalize)
            .ok_or_else(|| ApiError::decode("createComment returned no comment"))
    }

    pub async fn get_comment(&self, id: &str) -> Result<Comment, ApiError> {
        let request =
            GraphqlRequest::new(GET_COMMENT).variable("id", resource_iri("comments", id))?;
        let data: CommentData = self.query(request).await?;
        data.comment
            .map(normalize)
            .ok_or(ApiError::NotFound("comment"))
    }
}
