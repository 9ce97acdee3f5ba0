//! S3-backed blob store
//!
//! Blobs are uploaded from base64 data URLs and served back through a
//! public base URL. Resolving a public URL back to its object key is a
//! pure string operation so it works without a client.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::{Client, primitives::ByteStream};
use std::env;
use tracing::info;
use url::Url;

use crate::blob::{BlobResult, BlobStore, DataUrl};
use crate::error::BlobStoreError;

/// Blob storage configuration struct
#[derive(Debug, Clone)]
pub struct S3Config {
    /// Bucket receiving uploads
    pub bucket: String,
    /// Base URL under which uploaded objects are publicly reachable
    pub public_base_url: String,
}

impl S3Config {
    /// Create a new S3Config from environment variables
    ///
    /// # Environment Variables
    /// - `INVENTORY_BUCKET`: bucket name (default: `inventory-assets`)
    /// - `INVENTORY_PUBLIC_BASE_URL`: public base URL (default: the
    ///   bucket's virtual-hosted S3 URL)
    pub fn from_env() -> Self {
        let bucket =
            env::var("INVENTORY_BUCKET").unwrap_or_else(|_| "inventory-assets".to_string());
        let public_base_url = env::var("INVENTORY_PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("https://{bucket}.s3.amazonaws.com"));
        let public_base_url = public_base_url.trim_end_matches('/').to_string();

        Self {
            bucket,
            public_base_url,
        }
    }
}

/// Blob store over an S3 bucket
#[derive(Clone)]
pub struct S3BlobStore {
    client: Client,
    config: S3Config,
}

fn join_public_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn foreign(url: &str) -> BlobStoreError {
    BlobStoreError::ForeignUrl(url.to_string())
}

/// Extract the object key from a public URL served under `base_url`
fn resolve_key(base_url: &str, url: &str) -> BlobResult<String> {
    let trimmed = url.split_once('#').map_or(url, |(head, _)| head);
    let trimmed = trimmed.split_once('?').map_or(trimmed, |(head, _)| head);

    // The key must sit behind a `/` boundary; a host or path segment
    // that merely extends the base string is foreign.
    if let Some(key) = trimmed
        .strip_prefix(base_url)
        .and_then(|rest| rest.strip_prefix('/'))
    {
        if !key.is_empty() {
            return Ok(key.to_string());
        }
    }

    // Prefix matching misses URLs that spell the origin differently,
    // an explicit default port for example. Compare structurally.
    let base = Url::parse(base_url).map_err(|_| foreign(url))?;
    let candidate = Url::parse(trimmed).map_err(|_| foreign(url))?;
    let same_origin = base.scheme() == candidate.scheme()
        && base.host_str() == candidate.host_str()
        && base.port_or_known_default() == candidate.port_or_known_default();
    if !same_origin {
        return Err(foreign(url));
    }

    let base_path = base.path().trim_end_matches('/');
    let key = candidate
        .path()
        .strip_prefix(base_path)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or("");
    if key.is_empty() {
        Err(foreign(url))
    } else {
        Ok(key.to_string())
    }
}

impl S3BlobStore {
    /// Create a new store over an initialized client
    pub fn new(client: Client, config: S3Config) -> Self {
        Self { client, config }
    }

    /// Create a store from ambient AWS credentials and environment
    /// configuration
    pub async fn from_env() -> Self {
        let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        let client = Client::new(&aws_config);
        Self::new(client, S3Config::from_env())
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn upload(&self, path: &str, data_url: &str) -> BlobResult<String> {
        let payload = DataUrl::parse(data_url)?;
        let key = path.trim_start_matches('/');

        info!("Uploading blob to S3: {}", key);

        self.client
            .put_object()
            .bucket(&self.config.bucket)
            .key(key)
            .body(ByteStream::from(payload.bytes))
            .content_type(&payload.content_type)
            .send()
            .await
            .map_err(|e| BlobStoreError::Storage(e.to_string()))?;

        Ok(join_public_url(&self.config.public_base_url, key))
    }

    fn resolve_path(&self, url: &str) -> BlobResult<String> {
        resolve_key(&self.config.public_base_url, url)
    }

    async fn delete(&self, path: &str) -> BlobResult<()> {
        let key = path.trim_start_matches('/');

        info!("Deleting blob from S3: {}", key);

        self.client
            .delete_object()
            .bucket(&self.config.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| BlobStoreError::Storage(e.to_string()))?;

        Ok(())
    }
}
