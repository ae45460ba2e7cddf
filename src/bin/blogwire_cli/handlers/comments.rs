#![deny(clippy::all, clippy::pedantic)]

use blogwire::BlogClient;

use crate::args::CommentsCmd;
use crate::client::CliError;
use crate::io::read_value;
use crate::print::print_json;

pub async fn handle(client: &BlogClient, cmd: CommentsCmd) -> Result<(), CliError> {
    match cmd {
        CommentsCmd::Create {
            post,
            content,
            content_file,
        } => {
            let content = read_value(content, content_file)?;
            print_json(&client.create_comment(post, &content).await?)
        }
        CommentsCmd::Get { id } => print_json(&client.get_comment(&id).await?),
    }
}
