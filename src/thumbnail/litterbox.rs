use std::time::Duration;

use reqwest::blocking::{multipart, Client};
use sha2::{Digest, Sha256};

use super::ImageHost;
use crate::error::ThumbnailError;

const LITTERBOX_API_URL: &str = "https://litterbox.catbox.moe/resources/internals/api.php";
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(15);

/// Temporary image hosting on litterbox.catbox.moe
pub struct Litterbox {
    client: Client,
    endpoint: String,
    retention: String,
}

impl Litterbox {
    pub fn new(retention: impl Into<String>) -> Result<Self, ThumbnailError> {
        Self::with_endpoint(LITTERBOX_API_URL, retention)
    }

    pub fn with_endpoint(
        endpoint: impl Into<String>,
        retention: impl Into<String>,
    ) -> Result<Self, ThumbnailError> {
        let client = Client::builder().timeout(UPLOAD_TIMEOUT).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            retention: retention.into(),
        })
    }
}

/// Stable upload file name for a cache key
pub fn upload_file_name(key: &str) -> String {
    let digest = Sha256::digest(key.as_bytes());
    format!("{}.jpg", hex::encode(digest))
}

fn parse_upload_response(body: &str) -> Result<String, ThumbnailError> {
    let body = body.trim();
    if body.is_empty() {
        return Err(ThumbnailError::EmptyUpload);
    }
    if !body.starts_with("https://") {
        return Err(ThumbnailError::UploadRejected(body.to_string()));
    }
    Ok(body.to_string())
}

impl ImageHost for Litterbox {
    fn upload(&self, bytes: Vec<u8>, key: &str) -> Result<String, ThumbnailError> {
        let part = multipart::Part::bytes(bytes).file_name(upload_file_name(key));
        let form = multipart::Form::new()
            .text("reqtype", "fileupload")
            .text("time", self.retention.clone())
            .part("fileToUpload", part);

        let response = self.client.post(&self.endpoint).multipart(form).send()?;
        if !response.status().is_success() {
            return Err(ThumbnailError::Status(response.status()));
        }

        let url = parse_upload_response(&response.text()?)?;
        tracing::debug!("Uploaded thumbnail for {} to {}", key, url);
        Ok(url)
    }
}
