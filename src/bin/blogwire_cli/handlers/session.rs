#![deny(clippy::all, clippy::pedantic)]

use blogwire::BlogClient;
use blogwire_api_types::{LoginPayload, RegisterPayload};
use serde_json::json;

use crate::args::{LoginArgs, RegisterArgs};
use crate::client::CliError;
use crate::io::{PASSWORD_ENV, read_password};
use crate::print::print_json;

pub async fn login(client: &BlogClient, args: LoginArgs) -> Result<(), CliError> {
    let payload = LoginPayload {
        password: read_password(std::env::var(PASSWORD_ENV).ok(), args.password_file)?,
        username: args.username,
    };
    let tokens = client.login(&payload).await?;
    print_json(&json!({
        "authenticated": true,
        "refresh_token": tokens.refresh_token.is_some(),
    }))
}

pub async fn logout(client: &BlogClient) -> Result<(), CliError> {
    client.logout().await?;
    print_json(&json!({ "authenticated": false }))
}

pub async fn whoami(client: &BlogClient) -> Result<(), CliError> {
    let user = client.me_user().await?;
    print_json(&user)
}

pub async fn register(client: &BlogClient, args: RegisterArgs) -> Result<(), CliError> {
    let payload = RegisterPayload {
        password: read_password(std::env::var(PASSWORD_ENV).ok(), args.password_file)?,
        name: args.name,
        email: args.email,
    };
    let res = client.register(&payload).await?;
    print_json(&res)
}
