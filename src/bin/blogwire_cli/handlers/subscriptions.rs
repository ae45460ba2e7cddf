#![deny(clippy::all, clippy::pedantic)]

use blogwire::BlogClient;

use crate::args::SubscriptionsCmd;
use crate::client::CliError;
use crate::print::print_json;

pub async fn handle(client: &BlogClient, cmd: SubscriptionsCmd) -> Result<(), CliError> {
    match cmd {
        SubscriptionsCmd::Subscribe { blog_id } => print_json(&client.subscribe(blog_id).await?),
        SubscriptionsCmd::Unsubscribe { blog_id } => {
            print_json(&client.unsubscribe(blog_id).await?)
        }
    }
}
