/// In-process stand-in for the image collection service
use std::sync::Mutex;

use async_trait::async_trait;

use super::ImageApi;
use crate::error::ApiError;
use crate::state::data::{Image, ImageId, UploadFile};
use crate::state::session::Credential;

/// Which call the fake received
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List,
    Create { title: String },
    UpdateTitle { id: ImageId, title: String },
    Delete { id: ImageId },
    FetchImage { url: String },
}

#[derive(Debug, Default)]
struct Inner {
    images: Vec<Image>,
    next_id: u64,
    calls: Vec<Call>,
    failing: bool,
}

#[derive(Debug)]
pub struct FakeImageApi {
    token: String,
    inner: Mutex<Inner>,
}

impl FakeImageApi {
    /// A service that accepts `token` as its only valid bearer token
    pub fn new(token: &str, images: Vec<Image>) -> Self {
        Self {
            token: token.to_string(),
            inner: Mutex::new(Inner {
                next_id: images.len() as u64 + 1,
                images,
                ..Inner::default()
            }),
        }
    }

    /// Make every following call fail with a 500
    pub fn set_failing(&self, failing: bool) {
        self.inner.lock().unwrap().failing = failing;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }

    /// What a fresh fetch would return
    pub fn images(&self) -> Vec<Image> {
        self.inner.lock().unwrap().images.clone()
    }

    fn record(&self, call: Call) -> Result<std::sync::MutexGuard<'_, Inner>, ApiError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(call);
        if inner.failing {
            return Err(ApiError::Status {
                status: 500,
                body: "internal error".to_string(),
            });
        }
        Ok(inner)
    }

    fn authorize(&self, credential: &Credential) -> Result<(), ApiError> {
        if credential.token() == self.token {
            Ok(())
        } else {
            Err(ApiError::Status {
                status: 401,
                body: "invalid token".to_string(),
            })
        }
    }
}

fn not_found(id: &ImageId) -> ApiError {
    ApiError::Status {
        status: 404,
        body: format!("image {id} not found"),
    }
}

#[async_trait]
impl ImageApi for FakeImageApi {
    async fn list(&self) -> Result<Vec<Image>, ApiError> {
        let inner = self.record(Call::List)?;
        Ok(inner.images.clone())
    }

    async fn create(
        &self,
        credential: &Credential,
        title: &str,
        file: UploadFile,
    ) -> Result<Image, ApiError> {
        let mut inner = self.record(Call::Create {
            title: title.to_string(),
        })?;
        self.authorize(credential)?;

        let id = inner.next_id;
        inner.next_id += 1;
        let image = Image {
            id: ImageId::new(format!("img-{id}")),
            title: title.to_string(),
            url: format!("/uploads/{id}-{}", file.name),
        };
        inner.images.push(image.clone());
        Ok(image)
    }

    async fn update_title(
        &self,
        credential: &Credential,
        id: &ImageId,
        title: &str,
    ) -> Result<(), ApiError> {
        let mut inner = self.record(Call::UpdateTitle {
            id: id.clone(),
            title: title.to_string(),
        })?;
        self.authorize(credential)?;

        let image = inner
            .images
            .iter_mut()
            .find(|image| &image.id == id)
            .ok_or_else(|| not_found(id))?;
        image.title = title.to_string();
        Ok(())
    }

    async fn delete(&self, credential: &Credential, id: &ImageId) -> Result<(), ApiError> {
        let mut inner = self.record(Call::Delete { id: id.clone() })?;
        self.authorize(credential)?;

        let index = inner
            .images
            .iter()
            .position(|image| &image.id == id)
            .ok_or_else(|| not_found(id))?;
        inner.images.remove(index);
        Ok(())
    }

    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let _inner = self.record(Call::FetchImage {
            url: url.to_string(),
        })?;
        Ok(crate::state::data::png_bytes(8, 8))
    }
}
