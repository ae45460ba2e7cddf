#![deny(clippy::all, clippy::pedantic)]

use blogwire::BlogClient;
use blogwire::config::{LoadError, Settings};
use blogwire::http::ApiError;
use blogwire::infra::error::InfraError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("password is required (use --password-file or BLOGWIRE_PASSWORD)")]
    MissingPassword,
    #[error("failed to read input file {path}: {source}")]
    InputFile {
        path: String,
        source: std::io::Error,
    },
    #[error("configuration error: {0}")]
    Config(#[from] LoadError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] InfraError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}

pub fn build_client(settings: &Settings) -> Result<BlogClient, CliError> {
    Ok(BlogClient::from_settings(settings)?)
}
