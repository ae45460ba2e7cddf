use blogwire_api_types::{
    BlogSummary, Connection, CreatePostInput, Post, PostDetail, PostDraft, UpdatePostInput,
    id_from_iri, resource_iri,
};
use serde::Deserialize;

use super::BlogClient;
use crate::http::{ApiError, GraphqlRequest};

const LIST_POSTS: &str = r"query Posts {
  posts { edges { node { id title content createdAt updatedAt blog { id name } } } }
}";

const LIST_BLOG_POSTS: &str = r"query BlogPosts($blogId: ID!) {
  posts(blog_id: $blogId) { edges { node { id title content createdAt updatedAt blog { id name } } } }
}";

const GET_POST: &str = r"query Post($id: ID!) {
  post(id: $id) { id title content createdAt updatedAt blog { id name } author }
}";

const CREATE_POST: &str = r"mutation CreatePost($input: createPostInput!) {
  createPost(input: $input) { post { id title content createdAt } }
}";

const UPDATE_POST: &str = r"mutation UpdatePost($input: updatePostInput!) {
  updatePost(input: $input) { post { id title content createdAt updatedAt } }
}";

const GENERATE_POST: &str = r"query GeneratePost($title: String, $content: String, $blogId: String!) {
  generatePost(title: $title, content: $content, blogId: $blogId) { title content }
}";

#[derive(Deserialize)]
struct PostsData {
    posts: Option<Connection<PostDetail>>,
}

#[derive(Deserialize)]
struct PostData {
    post: Option<PostDetail>,
}

#[derive(Deserialize)]
struct PostPayload {
    post: Option<Post>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatePostData {
    create_post: PostPayload,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdatePostData {
    update_post: PostPayload,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeneratePostData {
    generate_post: Option<PostDraft>,
}

/// Replace the IRIs of a post and its blog with bare ids.
pub(crate) fn normalize_post(detail: PostDetail) -> PostDetail {
    PostDetail {
        post: Post {
            id: id_from_iri(&detail.post.id).to_string(),
            ..detail.post
        },
        blog: detail.blog.map(|blog| BlogSummary {
            id: id_from_iri(&blog.id).to_string(),
            name: blog.name,
        }),
        author: detail.author,
    }
}

fn normalize_posts(posts: Option<Connection<PostDetail>>) -> Vec<PostDetail> {
    posts
        .unwrap_or_default()
        .into_nodes()
        .into_iter()
        .map(normalize_post)
        .collect()
}

fn created_post(payload: PostPayload, operation: &str) -> Result<Post, ApiError> {
    let post = payload
        .post
        .ok_or_else(|| ApiError::decode(format!("{operation} returned no post")))?;
    Ok(Post {
        id: id_from_iri(&post.id).to_string(),
        ..post
    })
}

impl BlogClient {
    pub async fn list_posts(&self) -> Result<Vec<PostDetail>, ApiError> {
        let data: PostsData = self.query(GraphqlRequest::new(LIST_POSTS)).await?;
        Ok(normalize_posts(data.posts))
    }

    /// Posts belonging to one blog, identified by its bare id.
    pub async fn list_blog_posts(&self, blog_id: &str) -> Result<Vec<PostDetail>, ApiError> {
        let request = GraphqlRequest::new(LIST_BLOG_POSTS).variable("blogId", blog_id)?;
        let data: PostsData = self.query(request).await?;
        Ok(normalize_posts(data.posts))
    }

    pub async fn get_post(&self, id: &str) -> Result<PostDetail, ApiError> {
        let request = GraphqlRequest::new(GET_POST).variable("id", resource_iri("posts", id))?;
        let data: PostData = self.query(request).await?;
        data.post
            .map(normalize_post)
            .ok_or(ApiError::NotFound("post"))
    }

    pub async fn create_post(
        &self,
        title: &str,
        content: &str,
        blog_id: &str,
    ) -> Result<Post, ApiError> {
        let input = CreatePostInput {
            title: title.to_string(),
            content: content.to_string(),
            blog: resource_iri("blogs", blog_id),
        };
        let request = GraphqlRequest::new(CREATE_POST).variable("input", &input)?;
        let data: CreatePostData = self.query(request).await?;
        created_post(data.create_post, "createPost")
    }

    /// Change the title and/or content of a post; `None` leaves a field as is.
    pub async fn update_post(
        &self,
        id: &str,
        title: Option<&str>,
        content: Option<&str>,
    ) -> Result<Post, ApiError> {
        if title.is_none() && content.is_none() {
            return Err(ApiError::InvalidRequest(
                "update_post needs a title or content".to_string(),
            ));
        }
        let input = UpdatePostInput {
            id: resource_iri("posts", id),
            title: title.map(str::to_string),
            content: content.map(str::to_string),
        };
        let request = GraphqlRequest::new(UPDATE_POST).variable("input", &input)?;
        let data: UpdatePostData = self.query(request).await?;
        created_post(data.update_post, "updatePost")
    }

    /// Ask the server to draft a post for a blog, optionally seeded with a
    /// title or content.
    pub async fn generate_post(
        &self,
        title: Option<&str>,
        content: Option<&str>,
        blog_id: &str,
    ) -> Result<PostDraft, ApiError> {
        let request = GraphqlRequest::new(GENERATE_POST)
            .variable("title", title)?
            .variable("content", content)?
            .variable("blogId", blog_id)?;
        let data: GeneratePostData = self.query(request).await?;
        data.generate_post
            .ok_or_else(|| ApiError::decode("generatePost returned nothing"))
    }
}
