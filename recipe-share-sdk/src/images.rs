//! Image upload to blob storage
//!
//! Uploads never fail loudly: anything that goes wrong is logged and the
//! recipe is saved without an image.

use crate::config::SdkConfig;
use crate::error::{SdkError, SdkResult};
use async_trait::async_trait;
use rand::distributions::Alphanumeric;
use rand::Rng;
use reqwest::{header, Client};
use serde::Deserialize;
use tracing::{error, info};
use url::Url;

/// An image selected for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    fn is_usable(&self) -> bool {
        !self.bytes.is_empty() && !self.file_name.trim().is_empty()
    }
}

#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store the image and return its public URL.
    ///
    /// `None` for absent or empty input and for any upload failure.
    async fn save_image(&self, image: Option<&ImageUpload>) -> Option<String>;
}

/// [`ImageStore`] backed by an HTTP object store that accepts `PUT` and
/// answers `{ "url": ... }`
#[derive(Debug, Clone)]
pub struct BlobImageStore {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BlobResponse {
    url: String,
}

impl BlobImageStore {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> SdkResult<Self> {
        let base_url = Url::parse(&base_url.into())?;
        let client = Client::builder().build().map_err(SdkError::NetworkError)?;
        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    /// Store configured by `SdkConfig::blob_base_url`, if any
    pub fn from_config(config: &SdkConfig) -> SdkResult<Option<Self>> {
        let Some(base_url) = config.blob_base_url.as_deref() else {
            return Ok(None);
        };
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(SdkError::NetworkError)?;
        Ok(Some(Self {
            client,
            base_url: Url::parse(base_url)?,
            token: config.auth.token().map(str::to_string),
        }))
    }

    async fn upload(&self, image: &ImageUpload) -> SdkResult<String> {
        let url = self.object_url(&blob_name(&image.file_name))?;

        let mut request = self
            .client
            .put(url)
            .header(header::CONTENT_TYPE, image.content_type.as_str())
            .body(image.bytes.clone());
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(SdkError::from_response(status.as_u16(), &text));
        }

        let body: BlobResponse = serde_json::from_str(&text)?;
        Ok(body.url)
    }

    /// `name` appended to the base path as one percent-encoded segment
    fn object_url(&self, name: &str) -> SdkResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                SdkError::ConfigurationError(format!(
                    "image store URL {} cannot take a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .push(name);
        Ok(url)
    }
}

#[async_trait]
impl ImageStore for BlobImageStore {
    async fn save_image(&self, image: Option<&ImageUpload>) -> Option<String> {
        let image = image.filter(|image| image.is_usable())?;

        match self.upload(image).await {
            Ok(url) => {
                info!(url = %url, size = image.bytes.len(), "Uploaded image");
                Some(url)
            }
            Err(e) => {
                error!(file = %image.file_name, error = %e, "Error uploading image");
                None
            }
        }
    }
}

/// `"photo.jpg"` becomes `"photo-x8Kq2LmZ.jpg"`, so uploads never collide.
fn blob_name(file_name: &str) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(char::from)
        .collect();

    let file_name = file_name.trim();
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{}-{}.{}", stem, suffix, ext),
        _ => format!("{}-{}", file_name, suffix),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_name_keeps_extension() {
        let name = blob_name("sarma.jpg");
        assert!(name.starts_with("sarma-"));
        assert!(name.ends_with(".jpg"));
        assert_eq!(name.len(), "sarma-".len() + 8 + ".jpg".len());
    }

    #[test]
    fn test_blob_name_without_extension() {
        let name = blob_name("fotka");
        assert!(name.starts_with("fotka-"));
        assert_eq!(name.len(), "fotka-".len() + 8);
    }

    #[test]
    fn test_object_url_escapes_name() {
        let store = BlobImageStore::new("https://blob.example.com/slike/", None).unwrap();

        let url = store.object_url("tort#2?.jpg").unwrap();
        assert_eq!(url.as_str(), "https://blob.example.com/slike/tort%232%3F.jpg");
        assert_eq!(url.fragment(), None);
        assert_eq!(url.query(), None);

        let bare = BlobImageStore::new("https://blob.example.com", None).unwrap();
        assert_eq!(
            bare.object_url("a b.png").unwrap().as_str(),
            "https://blob.example.com/a%20b.png"
        );
    }

    #[tokio::test]
    async fn test_absent_or_empty_input_is_none() {
        let store = BlobImageStore::new("http://127.0.0.1:9", None).unwrap();

        assert_eq!(store.save_image(None).await, None);
        let empty = ImageUpload::new("a.png", "image/png", Vec::new());
        assert_eq!(store.save_image(Some(&empty)).await, None);
    }
}
