use thiserror::Error;

/// Error for image upload operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("No file uploaded")]
    EmptyFile,

    #[error("Image upload service is not configured properly")]
    NotConfigured,

    #[error("Media host rejected the upload: {0}")]
    Rejected(String),

    #[error("Media host request failed: {0}")]
    Transport(String),
}
