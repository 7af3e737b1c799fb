use async_trait::async_trait;

use crate::domain::image::errors::UploadError;
use crate::domain::image::models::ImageUpload;
use crate::domain::image::models::UploadedImage;

/// External media host that stores images and serves them by URL.
#[async_trait]
pub trait ImageStorage: Send + Sync + 'static {
    /// Upload an image.
    ///
    /// # Errors
    /// * `EmptyFile` - Upload has no content
    /// * `Rejected` - Media host refused the upload
    /// * `Transport` - Media host could not be reached or answered garbage
    async fn upload(&self, image: ImageUpload) -> Result<UploadedImage, UploadError>;
}
