use async_trait::async_trait;
use chrono::Utc;
use reqwest::multipart::Form;
use reqwest::multipart::Part;
use serde::Deserialize;
use sha2::Digest;
use sha2::Sha256;

use crate::config::MediaConfig;
use crate::domain::image::errors::UploadError;
use crate::domain::image::models::ImageUpload;
use crate::domain::image::models::UploadedImage;
use crate::domain::image::ports::ImageStorage;

/// Signed-upload client for the Cloudinary image API.
pub struct CloudinaryImageStorage {
    client: reqwest::Client,
    upload_url: String,
    api_key: String,
    api_secret: String,
}

#[derive(Debug, Deserialize)]
struct CloudinaryUploadResponse {
    secure_url: String,
}

impl CloudinaryImageStorage {
    pub fn new(config: &MediaConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            upload_url: format!(
                "{}/v1_1/{}/image/upload",
                config.api_url.trim_end_matches('/'),
                config.cloud_name
            ),
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
        }
    }

    /// Request signature: hex SHA-256 of the sorted signed parameters
    /// followed by the API secret.
    fn sign(&self, timestamp: i64) -> String {
        let payload = format!("timestamp={}{}", timestamp, self.api_secret);
        hex::encode(Sha256::digest(payload.as_bytes()))
    }
}

#[async_trait]
impl ImageStorage for CloudinaryImageStorage {
    async fn upload(&self, image: ImageUpload) -> Result<UploadedImage, UploadError> {
        if image.bytes.is_empty() {
            return Err(UploadError::EmptyFile);
        }

        let size = image.bytes.len();
        let mut file = Part::bytes(image.bytes)
            .file_name(image.file_name.unwrap_or_else(|| "upload".to_string()));
        if let Some(content_type) = image.content_type.as_deref() {
            file = file
                .mime_str(content_type)
                .map_err(|e| UploadError::Rejected(format!("Invalid content type: {}", e)))?;
        }

        let timestamp = Utc::now().timestamp();
        let form = Form::new()
            .part("file", file)
            .text("api_key", self.api_key.clone())
            .text("timestamp", timestamp.to_string())
            .text("signature_algorithm", "sha256")
            .text("signature", self.sign(timestamp));

        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UploadError::Rejected(format!("{}: {}", status, body)));
        }

        let body: CloudinaryUploadResponse = response
            .json()
            .await
            .map_err(|e| UploadError::Transport(e.to_string()))?;

        tracing::debug!(bytes = size, url = %body.secure_url, "Image uploaded");

        Ok(UploadedImage {
            url: body.secure_url,
        })
    }
}
