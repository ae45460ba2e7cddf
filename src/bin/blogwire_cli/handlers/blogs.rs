#![deny(clippy::all, clippy::pedantic)]

use blogwire::BlogClient;
use blogwire_api_types::CreateBlogInput;
use serde_json::json;

use crate::args::BlogsCmd;
use crate::client::CliError;
use crate::print::print_json;

pub async fn handle(client: &BlogClient, cmd: BlogsCmd) -> Result<(), CliError> {
    match cmd {
        BlogsCmd::List => print_json(&client.list_blogs().await?),
        BlogsCmd::Get { id } => print_json(&client.get_blog(&id).await?),
        BlogsCmd::Create { name, description } => {
            let blog = client
                .create_blog(&CreateBlogInput { name, description })
                .await?;
            print_json(&blog)
        }
        BlogsCmd::Generate { name, description } => {
            let draft = client
                .generate_blog(name.as_deref(), description.as_deref())
                .await?;
            print_json(&draft)
        }
        BlogsCmd::Delete { id } => {
            let deleted = client.delete_blog(&id).await?;
            print_json(&json!({ "id": id, "deleted": deleted }))
        }
    }
}
