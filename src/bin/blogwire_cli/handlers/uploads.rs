#![deny(clippy::all, clippy::pedantic)]

use blogwire::BlogClient;
use bytes::Bytes;
use serde_json::json;

use crate::args::UploadArgs;
use crate::client::CliError;
use crate::print::print_json;

pub async fn upload(client: &BlogClient, args: &UploadArgs) -> Result<(), CliError> {
    let data = tokio::fs::read(&args.file)
        .await
        .map_err(|source| CliError::InputFile {
            path: args.file.display().to_string(),
            source,
        })?;
    let file_name = args
        .file
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload.bin")
        .to_string();

    let url = client.upload_image(Bytes::from(data), &file_name).await?;
    print_json(&json!({ "url": url }))
}
