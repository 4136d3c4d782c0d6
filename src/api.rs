//! REST client for the image collection.
//!
//! [`GalleryApi`] is the seam the controller talks through; the
//! [`HttpGalleryApi`] implementation speaks to a real server with `reqwest`:
//!
//! | Method | Path          | Body                                  |
//! |--------|---------------|---------------------------------------|
//! | GET    | `{base}`      | -                                     |
//! | GET    | `{base}/{id}` | -                                     |
//! | POST   | `{base}`      | multipart: file, title, description?, tags? |
//! | PUT    | `{base}/{id}` | JSON `{title, description, tags}`     |
//! | DELETE | `{base}/{id}` | -                                     |

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::constants::HTTP_CONNECT_TIMEOUT_SECS;
use crate::error::{Error, Result};
use crate::model::{ErrorBody, ImageRecord, ImageUpdate, NewImage};

/// Operations the gallery server exposes.
///
/// Implementations must be thread-safe (`Send + Sync`) so a controller can be
/// shared across tasks.
#[async_trait]
pub trait GalleryApi: Send + Sync + 'static {
    /// Fetch every record in the collection.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-2xx status, or a body that
    /// is not a JSON array of records.
    async fn list(&self) -> Result<Vec<ImageRecord>>;

    /// Fetch a single record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Status`] with 404 when the record does not exist.
    async fn get(&self, id: &str) -> Result<ImageRecord>;

    /// Upload a new image.
    ///
    /// # Errors
    ///
    /// A rejected upload carries the server's `detail` message, if any.
    async fn create(&self, image: NewImage) -> Result<()>;

    /// Replace title, description and tags of a record.
    async fn update(&self, id: &str, update: &ImageUpdate) -> Result<()>;

    /// Delete a record.
    async fn delete(&self, id: &str) -> Result<()>;
}

/// [`GalleryApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpGalleryApi {
    client: reqwest::Client,
    collection: Url,
}

impl HttpGalleryApi {
    /// Create a client for the collection at `collection_path` on `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client cannot be
    /// built.
    pub fn new(base_url: &str, collection_path: &str) -> Result<Self> {
        let base = Url::parse(base_url).map_err(|e| Error::InvalidUrl(format!("{base_url}: {e}")))?;
        let collection = base
            .join(collection_path)
            .map_err(|e| Error::InvalidUrl(format!("{collection_path}: {e}")))?;
        if collection.cannot_be_a_base() {
            return Err(Error::InvalidUrl(collection.to_string()));
        }

        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS))
            .build()?;

        Ok(Self { client, collection })
    }

    /// URL of the collection resource.
    pub fn collection_url(&self) -> &Url {
        &self.collection
    }

    /// URL of a single record, with the id percent-encoded as one segment.
    pub fn item_url(&self, id: &str) -> Result<Url> {
        let mut url = self.collection.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(self.collection.to_string()))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }
}

/// Turn a non-2xx response into [`Error::Status`], keeping any `detail`.
async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let detail = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.message().map(ToString::to_string));
    warn!(status = status.as_u16(), detail = ?detail, "Gallery request failed");

    Err(Error::Status {
        status: status.as_u16(),
        detail,
    })
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| Error::decode(e.to_string()))
}

#[async_trait]
impl GalleryApi for HttpGalleryApi {
    async fn list(&self) -> Result<Vec<ImageRecord>> {
        debug!(url = %self.collection, "GET image list");
        let response = self.client.get(self.collection.clone()).send().await?;
        let records: Vec<ImageRecord> = decode(check(response).await?).await?;
        debug!(count = records.len(), "Image list received");
        Ok(records)
    }

    async fn get(&self, id: &str) -> Result<ImageRecord> {
        let url = self.item_url(id)?;
        debug!(%url, "GET image");
        let response = self.client.get(url).send().await?;
        decode(check(response).await?).await
    }

    async fn create(&self, image: NewImage) -> Result<()> {
        let NewImage {
            file,
            title,
            description,
            tags,
        } = image;
        debug!(
            url = %self.collection,
            file = %file.name,
            size = file.bytes.len(),
            "POST image"
        );

        let name = file.name.clone();
        let part = Part::bytes(file.bytes)
            .file_name(file.name)
            .mime_str(&file.content_type)
            .map_err(|e| Error::invalid_file(&name, e.to_string()))?;

        let mut form = Form::new().part("file", part).text("title", title);
        if let Some(description) = description {
            form = form.text("description", description);
        }
        if let Some(tags) = tags {
            form = form.text("tags", tags);
        }

        let response = self
            .client
            .post(self.collection.clone())
            .multipart(form)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    async fn update(&self, id: &str, update: &ImageUpdate) -> Result<()> {
        let url = self.item_url(id)?;
        debug!(%url, "PUT image");
        let response = self.client.put(url).json(update).send().await?;
        check(response).await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let url = self.item_url(id)?;
        debug!(%url, "DELETE image");
        let response = self.client.delete(url).send().await?;
        check(response).await?;
        Ok(())
    }
}
