use blogwire_api_types::{
    Blog, BlogDetail, BlogDraft, Connection, CreateBlogInput, DeleteBlogInput, Post,
    id_from_iri, resource_iri,
};
use serde::Deserialize;

use super::BlogClient;
use crate::http::{ApiError, GraphqlRequest};

const LIST_BLOGS: &str = r"query Blogs {
  blogs {
    edges { node { id name description subscribed blogUsers { edges { node { role } } } } }
  }
}";

const GET_BLOG: &str = r"query Blog($id: ID!) {
  blog(id: $id) {
    id name description subscribed
    blogUsers { edges { node { role } } }
    posts { edges { node { id title content createdAt updatedAt } } }
  }
}";

const CREATE_BLOG: &str = r"mutation CreateBlog($input: createBlogInput!) {
  createBlog(input: $input) { blog { id name description } }
}";

const DELETE_BLOG: &str = r"mutation DeleteBlog($input: deleteBlogInput!) {
  deleteBlog(input: $input) { blog { id } }
}";

const GENERATE_BLOG: &str = r"query GenerateBlog($name: String, $description: String) {
  generateBlog(name: $name, description: $description) { name description }
}";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlogNode {
    id: String,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    subscribed: Option<bool>,
    #[serde(default)]
    blog_users: Option<Connection<BlogUserNode>>,
    #[serde(default)]
    posts: Option<Connection<Post>>,
}

#[derive(Debug, Deserialize)]
struct BlogUserNode {
    role: String,
}

impl BlogNode {
    fn into_detail(self) -> BlogDetail {
        let posts = self
            .posts
            .unwrap_or_default()
            .into_nodes()
            .into_iter()
            .map(|post| Post {
                id: id_from_iri(&post.id).to_string(),
                ..post
            })
            .collect();
        let blog = Blog {
            id: id_from_iri(&self.id).to_string(),
            name: self.name,
            description: self.description.unwrap_or_default(),
            subscribed: self.subscribed,
            roles: self
                .blog_users
                .unwrap_or_default()
                .into_nodes()
                .into_iter()
                .map(|user| user.role)
                .collect(),
        };
        BlogDetail { blog, posts }
    }
}

#[derive(Deserialize)]
struct BlogsData {
    blogs: Option<Connection<BlogNode>>,
}

#[derive(Deserialize)]
struct BlogData {
    blog: Option<BlogNode>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateBlogData {
    create_blog: BlogPayload,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteBlogData {
    delete_blog: Option<DeletedBlog>,
}

#[derive(Deserialize)]
struct DeletedBlog {
    blog: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct BlogPayload {
    blog: Option<BlogNode>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateBlogData {
    generate_blog: Option<BlogDraft>,
}

impl BlogClient {
    pub async fn list_blogs(&self) -> Result<Vec<Blog>, ApiError> {
        let data: BlogsData = self.query(GraphqlRequest::new(LIST_BLOGS)).await?;
        Ok(data
            .blogs
            .unwrap_or_default()
            .into_nodes()
            .into_iter()
            .map(|node| node.into_detail().blog)
            .collect())
    }

    /// A blog and its posts.
    pub async fn get_blog(&self, id: &str) -> Result<BlogDetail, ApiError> {
        let request = GraphqlRequest::new(GET_BLOG).variable("id", resource_iri("blogs", id))?;
        let data: BlogData = self.query(request).await?;
        data.blog
            .map(BlogNode::into_detail)
            .ok_or(ApiError::NotFound("blog"))
    }

    pub async fn create_blog(&self, input: &CreateBlogInput) -> Result<Blog, ApiError> {
        let request = GraphqlRequest::new(CREATE_BLOG).variable("input", input)?;
        let data: CreateBlogData = self.query(request).await?;
        data.create_blog
            .blog
            .map(|node| node.into_detail().blog)
            .ok_or_else(|| ApiError::decode("createBlog returned no blog"))
    }

    /// Returns whether the server reported a deleted blog.
    pub async fn delete_blog(&self, id: &str) -> Result<bool, ApiError> {
        let input = DeleteBlogInput {
            id: resource_iri("blogs", id),
        };
        let request = GraphqlRequest::new(DELETE_BLOG).variable("input", &input)?;
        let data: DeleteBlogData = self.query(request).await?;
        Ok(data
            .delete_blog
            .and_then(|deleted| deleted.blog)
            .is_some_and(|blog| !blog.is_null()))
    }

    /// Ask the server to suggest a blog name and description.
    pub async fn generate_blog(
        &self,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<BlogDraft, ApiError> {
        let request = GraphqlRequest::new(GENERATE_BLOG)
            .variable("name", name)?
            .variable("description", description)?;
        let data: GenerateBlogData = self.query(request).await?;
        data.generate_blog
            .ok_or_else(|| ApiError::decode("generateBlog returned nothing"))
    }
}
