/// Public gallery: a read-only copy of the remote collection,
/// fetched once each time the gallery is shown.
use tracing::{error, info};

use super::collection::{ImageCollection, LoadStatus, Presentation};
use super::data::Image;
use crate::error::ApiError;

#[derive(Debug, Clone)]
pub struct GalleryState {
    images: ImageCollection,
    status: LoadStatus,
}

impl Default for GalleryState {
    fn default() -> Self {
        Self::new()
    }
}

impl GalleryState {
    /// A gallery waiting for its first fetch
    pub fn new() -> Self {
        Self {
            images: ImageCollection::new(),
            status: LoadStatus::Loading,
        }
    }

    /// Mark a (re)fetch as outstanding
    pub fn reload(&mut self) {
        self.status = LoadStatus::Loading;
    }

    pub fn loaded(&mut self, result: Result<Vec<Image>, ApiError>) {
        match result {
            Ok(images) => {
                info!("Gallery loaded {} images", images.len());
                self.images.replace(images);
                self.status = LoadStatus::Loaded;
            }
            Err(e) => {
                error!("Error fetching images: {e}");
                self.images.clear();
                self.status = LoadStatus::Failed(e);
            }
        }
    }

    pub fn images(&self) -> &ImageCollection {
        &self.images
    }

    #[cfg(test)]
    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn presentation(&self) -> Presentation {
        self.images.presentation(&self.status)
    }
}
