//! Blob store abstraction
//!
//! Binary assets arrive as base64 data-URLs and are addressed by
//! resolved public URLs once stored. `resolve_path` inverts the URL
//! returned by `upload` so callers can act on a blob they only know by
//! its URL.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::error::BlobStoreError;

/// Type alias for Result with BlobStoreError
pub type BlobResult<T> = Result<T, BlobStoreError>;

/// Decoded `data:` URL payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl DataUrl {
    /// Parse a `data:<mime>;base64,<payload>` string
    pub fn parse(data_url: &str) -> BlobResult<Self> {
        let rest = data_url
            .strip_prefix("data:")
            .ok_or_else(|| BlobStoreError::InvalidDataUrl("missing data: scheme".to_string()))?;
        let (meta, payload) = rest.split_once(',').ok_or_else(|| {
            BlobStoreError::InvalidDataUrl("missing payload separator".to_string())
        })?;
        let content_type = meta.strip_suffix(";base64").ok_or_else(|| {
            BlobStoreError::InvalidDataUrl("payload must be base64 encoded".to_string())
        })?;
        if content_type.is_empty() {
            return Err(BlobStoreError::InvalidDataUrl(
                "missing content type".to_string(),
            ));
        }
        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|e| BlobStoreError::InvalidDataUrl(e.to_string()))?;
        Ok(Self {
            content_type: content_type.to_string(),
            bytes,
        })
    }

    /// True when the string is a data-URL rather than a resolved
    /// storage URL
    pub fn is_data_url(value: &str) -> bool {
        value.starts_with("data:")
    }
}

/// Binary object storage interface
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store a data-URL payload at `path`, returning the resolved
    /// public URL of the blob
    async fn upload(&self, path: &str, data_url: &str) -> BlobResult<String>;

    /// Recover the storage path from a URL previously returned by
    /// `upload`
    fn resolve_path(&self, url: &str) -> BlobResult<String>;

    /// Delete the blob at `path`; deleting an absent blob is not an
    /// error
    async fn delete(&self, path: &str) -> BlobResult<()>;
}
