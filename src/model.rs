//! Wire types for the image collection endpoint.

use serde::{Deserialize, Serialize};

use crate::constants::TAG_SEPARATOR;

/// One image's metadata as returned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    pub url: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    pub size: u64,
    pub created_at: String,
    #[serde(default)]
    pub content_type: Option<String>,
}

impl ImageRecord {
    /// Thumbnail locator, falling back to the full image.
    pub fn thumbnail(&self) -> &str {
        self.thumbnail_url.as_deref().unwrap_or(&self.url)
    }

    /// Tags joined the way the edit form shows them.
    pub fn joined_tags(&self) -> String {
        self.tags.join(TAG_SEPARATOR)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body of `PUT {base}/{id}`.
///
/// Every key is always serialized. `None` goes over the wire as `null` and
/// clears the field on the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl ImageUpdate {
    /// Build an update from raw form input.
    ///
    /// Fields are trimmed; an empty field becomes a clear marker. Tags are
    /// split on commas and empty entries dropped.
    pub fn from_form(title: &str, description: &str, tags: &str) -> Self {
        let tags = split_tags(tags);
        Self {
            title: non_empty(title),
            description: non_empty(description),
            tags: (!tags.is_empty()).then_some(tags),
        }
    }
}

/// Split a comma-separated tag field into trimmed, non-empty tags.
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Trimmed value, or `None` when nothing is left.
pub fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// A file picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    /// Create a selection, guessing the content type from the file name.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let content_type = mime_guess::from_path(&name)
            .first()
            .map(|mime| mime.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());
        Self {
            name,
            content_type,
            bytes,
        }
    }

    /// Whether the selection looks like an image.
    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }
}

/// Payload of `POST {base}`, already validated and trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewImage {
    pub file: SelectedFile,
    pub title: String,
    /// Only present when non-empty.
    pub description: Option<String>,
    /// Raw comma-separated tags, only present when non-empty.
    pub tags: Option<String>,
}

/// Error body returned by the server on failed requests.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// The detail as a string, when the server sent one.
    pub fn message(&self) -> Option<&str> {
        match &self.detail {
            Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s),
            _ => None,
        }
    }
}
