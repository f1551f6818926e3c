use std::fmt;

use image::imageops::FilterType;
use tokio::task;

/// Size of generated thumbnails (fits within a square)
pub const THUMBNAIL_SIZE: u32 = 256;

/// Decoded RGBA thumbnail ready to hand to the renderer
#[derive(Clone)]
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl fmt::Debug for Thumbnail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Thumbnail({}x{})", self.width, self.height)
    }
}

/// Decode fetched image bytes and shrink them to a thumbnail
///
/// Decoding is CPU-bound, so it runs on the blocking pool.
pub async fn make_thumbnail(bytes: Vec<u8>) -> Result<Thumbnail, String> {
    task::spawn_blocking(move || make_thumbnail_blocking(&bytes))
        .await
        .map_err(|e| format!("Task join error: {}", e))?
}

fn make_thumbnail_blocking(bytes: &[u8]) -> Result<Thumbnail, String> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| format!("Failed to decode image: {}", e))?;

    // Never upscale small images
    let thumbnail = if img.width() > THUMBNAIL_SIZE || img.height() > THUMBNAIL_SIZE {
        img.resize(THUMBNAIL_SIZE, THUMBNAIL_SIZE, FilterType::Lanczos3)
    } else {
        img
    };

    let rgba = thumbnail.to_rgba8();
    Ok(Thumbnail {
        width: rgba.width(),
        height: rgba.height(),
        rgba: rgba.into_raw(),
    })
}
