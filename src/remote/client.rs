/// reqwest client for the image collection service
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::ImageApi;
use crate::error::ApiError;
use crate::state::data::{Image, ImageId, UploadFile};
use crate::state::session::Credential;

#[derive(Serialize)]
struct TitlePatch<'a> {
    title: &'a str,
}

#[derive(Debug, Clone)]
pub struct HttpImageApi {
    client: Client,
    base_url: Url,
}

impl HttpImageApi {
    /// `base_url` must end in `/` so relative joins keep its path
    pub fn new(base_url: Url) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(concat!("image-gallery/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::InvalidUrl(format!("{path}: {e}")))
    }

    /// `/api/images/{id}` with the id pushed as one escaped segment
    fn image_url(&self, id: &ImageId) -> Result<Url, ApiError> {
        let mut url = self.endpoint("api/images")?;
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .push(id.as_str());
        Ok(url)
    }

    /// Resolve a record url, which may be relative to the service
    fn resolve(&self, url: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(url)
            .map_err(|e| ApiError::InvalidUrl(format!("{url}: {e}")))
    }
}

async fn check(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Status {
        status: status.as_u16(),
        body,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| ApiError::Decode(format!("{e} in {text:?}")))
}

#[async_trait]
impl ImageApi for HttpImageApi {
    async fn list(&self) -> Result<Vec<Image>, ApiError> {
        let url = self.endpoint("api/images")?;
        debug!("GET {url}");

        let response = check(self.client.get(url).send().await?).await?;
        decode(response).await
    }

    async fn create(
        &self,
        credential: &Credential,
        title: &str,
        file: UploadFile,
    ) -> Result<Image, ApiError> {
        let url = self.endpoint("api/images/upload")?;
        debug!("POST {url} ({} bytes)", file.bytes.len());

        let part = Part::bytes(file.bytes)
            .file_name(file.name)
            .mime_str(file.mime)?;
        let form = Form::new().part("file", part).text("title", title.to_string());

        let response = self
            .client
            .post(url)
            .bearer_auth(credential.token())
            .multipart(form)
            .send()
            .await?;
        decode(check(response).await?).await
    }

    async fn update_title(
        &self,
        credential: &Credential,
        id: &ImageId,
        title: &str,
    ) -> Result<(), ApiError> {
        let url = self.image_url(id)?;
        debug!("PUT {url}");

        let response = self
            .client
            .put(url)
            .bearer_auth(credential.token())
            .json(&TitlePatch { title })
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    async fn delete(&self, credential: &Credential, id: &ImageId) -> Result<(), ApiError> {
        let url = self.image_url(id)?;
        debug!("DELETE {url}");

        let response = self
            .client
            .delete(url)
            .bearer_auth(credential.token())
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let url = self.resolve(url)?;
        let response = check(self.client.get(url).send().await?).await?;
        Ok(response.bytes().await?.to_vec())
    }
}
