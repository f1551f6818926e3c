/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the remote API layer and the UI layer.
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::UploadError;

/// Opaque identifier assigned by the remote service
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ImageId(String);

impl ImageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Some services hand out numeric ids; they are kept as opaque strings.
impl<'de> Deserialize<'de> for ImageId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(id) => ImageId(id),
            RawId::Number(id) => ImageId(id.to_string()),
        })
    }
}

/// Represents a single image in the remote collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    /// Server-assigned id, immutable once created
    #[serde(rename = "_id", alias = "id")]
    pub id: ImageId,
    /// Human-readable title
    pub title: String,
    /// Location of the image content (absolute, or relative to the API base)
    pub url: String,
}

/// An image file picked by the admin, ready to be sent as multipart
#[derive(Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// File name reported to the service
    pub name: String,
    /// Sniffed content type (e.g. "image/png")
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    /// Validate picked bytes and detect their image format
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, UploadError> {
        if bytes.is_empty() {
            return Err(UploadError::Empty);
        }

        let format = image::guess_format(&bytes).map_err(|_| UploadError::NotAnImage)?;

        Ok(Self {
            name: name.into(),
            mime: format.to_mime_type(),
            bytes,
        })
    }
}

// Keep the payload out of logs
impl fmt::Debug for UploadFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadFile")
            .field("name", &self.name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    use image::{DynamicImage, ImageFormat, RgbImage};
    use std::io::Cursor;

    let pixels = RgbImage::from_pixel(width, height, image::Rgb([200, 80, 40]));
    let img = DynamicImage::ImageRgb8(pixels);
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}
