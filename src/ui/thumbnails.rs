/// Per-image thumbnail cache shared by the gallery grid and the admin table
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use iced::widget::image::Handle;
use tracing::warn;

use crate::remote::thumbnail::Thumbnail;
use crate::state::data::{Image, ImageId};

#[derive(Debug, Clone)]
enum Slot {
    /// Fetch issued, not back yet
    Pending,
    Ready(Handle),
    /// Fetch or decode failed; not retried
    Failed,
}

#[derive(Debug, Default)]
pub struct ThumbnailCache {
    slots: HashMap<ImageId, Slot>,
}

impl ThumbnailCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark unseen images as pending and return them for fetching
    pub fn request<'a>(&mut self, images: impl IntoIterator<Item = &'a Image>) -> Vec<Image> {
        let mut wanted = Vec::new();
        for image in images {
            if let Entry::Vacant(slot) = self.slots.entry(image.id.clone()) {
                slot.insert(Slot::Pending);
                wanted.push(image.clone());
            }
        }
        wanted
    }

    pub fn insert(&mut self, id: ImageId, result: Result<Thumbnail, String>) {
        let slot = match result {
            Ok(thumbnail) => Slot::Ready(Handle::from_rgba(
                thumbnail.width,
                thumbnail.height,
                thumbnail.rgba,
            )),
            Err(e) => {
                warn!("⚠️  Thumbnail for image {id} failed: {e}");
                Slot::Failed
            }
        };
        self.slots.insert(id, slot);
    }

    pub fn get(&self, id: &ImageId) -> Option<&Handle> {
        match self.slots.get(id) {
            Some(Slot::Ready(handle)) => Some(handle),
            _ => None,
        }
    }

    /// Drop entries for images no longer in `images`
    pub fn retain<'a>(&mut self, images: impl IntoIterator<Item = &'a Image>) {
        let keep: HashSet<&ImageId> = images.into_iter().map(|image| &image.id).collect();
        self.slots.retain(|id, _| keep.contains(id));
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.slots.len()
    }
}
