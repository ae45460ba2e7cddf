//! Command-line surface for `blogwire`.
//! Kept in its own file so tests can build commands without parsing argv.

#![deny(clippy::all, clippy::pedantic)]

use std::path::PathBuf;

use blogwire::config::ConfigArgs;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "blogwire", version, about = "Blogwire GraphQL blogging client", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and store the issued tokens
    Login(LoginArgs),
    /// Forget stored tokens
    Logout,
    /// Show the user the stored token belongs to
    Whoami,
    /// Create an account
    Register(RegisterArgs),
    /// Blog management
    Blogs(BlogsArgs),
    /// Post management
    Posts(PostsArgs),
    /// Comments on posts
    Comments(CommentsArgs),
    /// Blog subscriptions
    Subscriptions(SubscriptionsArgs),
    /// Upload an image and print its URL
    Upload(UploadArgs),
    /// Run a raw GraphQL document
    Graphql(GraphqlArgs),
}

#[derive(Parser, Debug)]
pub struct LoginArgs {
    #[arg(long)]
    pub username: String,

    /// Path to a file containing the password; otherwise `BLOGWIRE_PASSWORD` is read
    #[arg(long, env = "BLOGWIRE_PASSWORD_FILE")]
    pub password_file: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct RegisterArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub email: String,

    /// Path to a file containing the password; otherwise `BLOGWIRE_PASSWORD` is read
    #[arg(long, env = "BLOGWIRE_PASSWORD_FILE")]
    pub password_file: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct BlogsArgs {
    #[command(subcommand)]
    pub action: BlogsCmd,
}

#[derive(Subcommand, Debug)]
pub enum BlogsCmd {
    /// List blogs
    List,
    /// Get a blog and its posts by id
    Get { id: String },
    /// Create a blog
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Ask the server to suggest a blog name and description
    Generate {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a blog by id
    Delete { id: String },
}

#[derive(Parser, Debug)]
pub struct PostsArgs {
    #[command(subcommand)]
    pub action: PostsCmd,
}

#[derive(Subcommand, Debug)]
pub enum PostsCmd {
    /// List posts, optionally restricted to one blog
    List {
        #[arg(long)]
        blog: Option<String>,
    },
    /// Get a post by id
    Get { id: String },
    /// Create a post in a blog
    Create {
        #[arg(long)]
        blog: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        content_file: Option<PathBuf>,
    },
    /// Update the title and/or content of a post
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        content_file: Option<PathBuf>,
    },
    /// Ask the server to draft a post for a blog
    Generate {
        #[arg(long)]
        blog: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },
}

#[derive(Parser, Debug)]
pub struct CommentsArgs {
    #[command(subcommand)]
    pub action: CommentsCmd,
}

#[derive(Subcommand, Debug)]
pub enum CommentsCmd {
    /// Comment on a post
    Create {
        #[arg(long)]
        post: i64,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        content_file: Option<PathBuf>,
    },
    /// Get a comment by id
    Get { id: String },
}

#[derive(Parser, Debug)]
pub struct SubscriptionsArgs {
    #[command(subcommand)]
    pub action: SubscriptionsCmd,
}

#[derive(Subcommand, Debug)]
pub enum SubscriptionsCmd {
    /// Follow a blog
    Subscribe { blog_id: i64 },
    /// Stop following a blog
    Unsubscribe { blog_id: i64 },
}

#[derive(Parser, Debug)]
pub struct UploadArgs {
    /// Image file to upload
    pub file: PathBuf,
}

#[derive(Parser, Debug)]
pub struct GraphqlArgs {
    /// GraphQL document (or use --query-file)
    pub query: Option<String>,
    #[arg(long)]
    pub query_file: Option<PathBuf>,
    /// Variables as a JSON object
    #[arg(long)]
    pub variables: Option<String>,
}
