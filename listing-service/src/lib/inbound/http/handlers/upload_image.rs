use axum::extract::multipart::MultipartError;
use axum::extract::multipart::MultipartRejection;
use axum::extract::Multipart;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::image::errors::UploadError;
use crate::domain::image::models::ImageUpload;
use crate::inbound::http::middleware::AuthenticatedContext;
use crate::inbound::http::router::AppState;

const FILE_FIELD: &str = "file";

pub async fn upload_image(
    State(state): State<AppState>,
    context: AuthenticatedContext,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<ApiSuccess<UploadImageResponseData>, ApiError> {
    let multipart = multipart.map_err(|_| ApiError::from(UploadError::EmptyFile))?;
    let upload = read_file_field(multipart).await?.ok_or(UploadError::EmptyFile)?;

    let storage = state.image_storage.as_ref().ok_or_else(|| {
        tracing::error!("Media host credentials are not configured");
        UploadError::NotConfigured
    })?;

    let size = upload.bytes.len();
    let uploaded = storage.upload(upload).await?;

    tracing::info!(
        user_id = %context.user_id,
        size,
        url = %uploaded.url,
        "Image uploaded"
    );

    Ok(ApiSuccess::new(
        StatusCode::OK,
        UploadImageResponseData { url: uploaded.url },
    ))
}

/// Take the first non-empty `file` part, skipping any other fields.
async fn read_file_field(mut multipart: Multipart) -> Result<Option<ImageUpload>, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(multipart_error)?;

        if bytes.is_empty() {
            return Ok(None);
        }

        return Ok(Some(ImageUpload {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        }));
    }

    Ok(None)
}

fn multipart_error(err: MultipartError) -> ApiError {
    match err.status() {
        StatusCode::PAYLOAD_TOO_LARGE => ApiError::PayloadTooLarge(err.body_text()),
        _ => ApiError::BadRequest(err.body_text()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadImageResponseData {
    pub url: String,
}
