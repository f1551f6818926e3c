/// Remote image collection module
///
/// This module handles:
/// - The `ImageApi` seam the controllers talk to
/// - The reqwest-backed client for the real service (client.rs)
/// - Downscaling fetched images into thumbnails (thumbnail.rs)
use async_trait::async_trait;

use crate::error::ApiError;
use crate::state::data::{Image, ImageId, UploadFile};
use crate::state::session::Credential;

pub mod client;
pub mod thumbnail;

#[cfg(test)]
pub mod fake;

pub use client::HttpImageApi;

/// Operations offered by the image collection service
#[async_trait]
pub trait ImageApi: Send + Sync {
    /// Fetch the full collection
    async fn list(&self) -> Result<Vec<Image>, ApiError>;

    /// Upload a new image; returns the record with server-assigned id and url
    async fn create(
        &self,
        credential: &Credential,
        title: &str,
        file: UploadFile,
    ) -> Result<Image, ApiError>;

    /// Change the title of an existing image
    async fn update_title(
        &self,
        credential: &Credential,
        id: &ImageId,
        title: &str,
    ) -> Result<(), ApiError>;

    async fn delete(&self, credential: &Credential, id: &ImageId) -> Result<(), ApiError>;

    /// Download the content behind a record's url
    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, ApiError>;
}
