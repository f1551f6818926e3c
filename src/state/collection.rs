/// Local mirror of the remote image collection
///
/// The mirror is a cache, never the source of truth: it is replaced
/// wholesale on load and patched only after the service confirms a change.
use super::data::{Image, ImageId};
use crate::error::ApiError;

/// Where the mirror is in its initial fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Loading,
    Loaded,
    /// The fetch failed; the mirror stays empty until a retry
    Failed(ApiError),
}

impl LoadStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadStatus::Loading)
    }
}

/// What a collection view should render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    Loading,
    /// Nothing to show; `retry` is set when the fetch failed
    Empty { retry: bool },
    Images,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageCollection {
    images: Vec<Image>,
}

impl ImageCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole mirror with a fresh fetch
    pub fn replace(&mut self, images: Vec<Image>) {
        self.images = images;
    }

    pub fn clear(&mut self) {
        self.images.clear();
    }

    /// Append a record confirmed by the service
    pub fn push(&mut self, image: Image) {
        self.images.push(image);
    }

    /// Change the title of one record in place.
    /// Returns false when no record has that id.
    pub fn rename(&mut self, id: &ImageId, title: &str) -> bool {
        match self.images.iter_mut().find(|image| &image.id == id) {
            Some(image) => {
                image.title = title.to_string();
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &ImageId) -> Option<Image> {
        let index = self.images.iter().position(|image| &image.id == id)?;
        Some(self.images.remove(index))
    }

    pub fn get(&self, id: &ImageId) -> Option<&Image> {
        self.images.iter().find(|image| &image.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Image> {
        self.images.iter()
    }

    pub fn as_slice(&self) -> &[Image] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Pick the presentation for this mirror given its load status
    pub fn presentation(&self, status: &LoadStatus) -> Presentation {
        match status {
            LoadStatus::Loading => Presentation::Loading,
            LoadStatus::Failed(_) => Presentation::Empty { retry: true },
            LoadStatus::Loaded if self.images.is_empty() => Presentation::Empty { retry: false },
            LoadStatus::Loaded => Presentation::Images,
        }
    }
}
