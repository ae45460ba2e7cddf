#![deny(clippy::all, clippy::pedantic)]

use blogwire::BlogClient;

use crate::args::PostsCmd;
use crate::client::CliError;
use crate::io::{read_opt_value, read_value};
use crate::print::print_json;

pub async fn handle(client: &BlogClient, cmd: PostsCmd) -> Result<(), CliError> {
    match cmd {
        PostsCmd::List { blog } => {
            let posts = match blog {
                Some(blog_id) => client.list_blog_posts(&blog_id).await?,
                None => client.list_posts().await?,
            };
            print_json(&posts)
        }
        PostsCmd::Get { id } => print_json(&client.get_post(&id).await?),
        PostsCmd::Create {
            blog,
            title,
            content,
            content_file,
        } => {
            let content = read_value(content, content_file)?;
            let post = client.create_post(&title, &content, &blog).await?;
            print_json(&post)
        }
        PostsCmd::Update {
            id,
            title,
            content,
            content_file,
        } => {
            let content = read_opt_value(content, content_file)?;
            if title.is_none() && content.is_none() {
                return Err(CliError::InvalidInput(
                    "nothing to update: pass --title and/or --content".into(),
                ));
            }
            let post = client
                .update_post(&id, title.as_deref(), content.as_deref())
                .await?;
            print_json(&post)
        }
        PostsCmd::Generate {
            blog,
            title,
            content,
        } => {
            let draft = client
                .generate_post(title.as_deref(), content.as_deref(), &blog)
                .await?;
            print_json(&draft)
        }
    }
}
