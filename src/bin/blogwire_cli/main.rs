//! blogwire: command-line client for the blogging GraphQL API.
//! Every command prints JSON on stdout; logs go to stderr.
#![deny(clippy::all, clippy::pedantic)]

mod args;
mod client;
mod handlers;
mod io;
mod print;

use blogwire::config;
use blogwire::infra::telemetry;
use clap::Parser;

use args::{Cli, Commands};
use client::{CliError, build_client};
use handlers::{blogs, comments, graphql, posts, session, subscriptions, uploads};

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let settings = config::load(&cli.config)?;
    telemetry::init(&settings.logging)?;
    let client = build_client(&settings)?;

    match cli.command {
        Commands::Login(args) => session::login(&client, args).await?,
        Commands::Logout => session::logout(&client).await?,
        Commands::Whoami => session::whoami(&client).await?,
        Commands::Register(args) => session::register(&client, args).await?,
        Commands::Blogs(cmd) => blogs::handle(&client, cmd.action).await?,
        Commands::Posts(cmd) => posts::handle(&client, cmd.action).await?,
        Commands::Comments(cmd) => comments::handle(&client, cmd.action).await?,
        Commands::Subscriptions(cmd) => subscriptions::handle(&client, cmd.action).await?,
        Commands::Upload(args) => uploads::upload(&client, &args).await?,
        Commands::Graphql(args) => graphql::run(&client, args).await?,
    }

    Ok(())
}
