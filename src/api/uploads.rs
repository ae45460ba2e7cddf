use bytes::Bytes;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument};

use super::BlogClient;
use crate::http::{ApiError, MultipartField, RequestDescriptor, ResponseFormat};

const UPLOAD_IMAGE: &str = r"mutation UploadImage($input: uploadImageInput!) {
  uploadImage(input: $input) { image { url } }
}";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadImageData {
    upload_image: UploadedImagePayload,
}

#[derive(Deserialize)]
struct UploadedImagePayload {
    image: Option<UploadedImage>,
}

#[derive(Deserialize)]
struct UploadedImage {
    url: String,
}

/// Fields of a GraphQL multipart request carrying one file in
/// `variables.input.file`.
fn upload_fields(bytes: Bytes, file_name: &str) -> Vec<MultipartField> {
    let operations = json!({
        "query": UPLOAD_IMAGE,
        "variables": { "input": { "file": null } },
    });
    let map = json!({ "0": ["variables.input.file"] });
    let mime = mime_guess::from_path(file_name).first_or_octet_stream();

    vec![
        MultipartField::text("operations", operations.to_string()),
        MultipartField::text("map", map.to_string()),
        MultipartField::file("0", bytes, file_name, mime.essence_str()),
    ]
}

impl BlogClient {
    /// Upload an image and return its absolute URL.
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn upload_image(&self, bytes: Bytes, file_name: &str) -> Result<String, ApiError> {
        let descriptor = RequestDescriptor::post(self.pipeline.graphql_path())
            .with_multipart(upload_fields(bytes, file_name))
            .with_format(ResponseFormat::Graphql);
        let data: UploadImageData = self.pipeline.send(&descriptor).await?.decode()?;
        let url = data
            .upload_image
            .image
            .map(|image| image.url)
            .ok_or_else(|| ApiError::decode("uploadImage returned no image"))?;
        debug!(%url, "image uploaded");
        Ok(self.absolute_url(&url))
    }

    /// Resolve a server-relative URL against the API base.
    fn absolute_url(&self, url: &str) -> String {
        if url::Url::parse(url).is_ok() {
            return url.to_string();
        }
        let base = self.pipeline.base_url().as_str().trim_end_matches('/');
        if url.starts_with('/') {
            format!("{base}{url}")
        } else {
            format!("{base}/{url}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::FieldContent;

    #[test]
    fn upload_fields_follow_multipart_request_layout() {
        let fields = upload_fields(Bytes::from_static(b"\x89PNG"), "cat.png");
        let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["operations", "map", "0"]);

        match &fields[1].content {
            FieldContent::Text(map) => assert_eq!(map, r#"{"0":["variables.input.file"]}"#),
            other => panic!("unexpected map field {other:?}"),
        }
        match &fields[2].content {
            FieldContent::File {
                file_name, mime, ..
            } => {
                assert_eq!(file_name, "cat.png");
                assert_eq!(mime, "image/png");
            }
            other => panic!("unexpected file field {other:?}"),
        }
    }

    #[test]
    fn unknown_extension_uploads_as_octet_stream() {
        let fields = upload_fields(Bytes::from_static(b"data"), "blob.unknownext");
        match &fields[2].content {
            FieldContent::File { mime, .. } => assert_eq!(mime, "application/octet-stream"),
            other => panic!("unexpected file field {other:?}"),
        }
    }
}
