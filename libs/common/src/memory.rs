//! In-memory document and blob stores
//!
//! Adapters for tests and local development. Both keep their state
//! behind a tokio `RwLock` so they satisfy the same `Send + Sync`
//! contracts as the production adapters.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::blob::{BlobResult, BlobStore, DataUrl};
use crate::document::{
    CollectionPath, Constraint, Document, DocumentPath, DocumentResult, DocumentStore,
    apply_constraints,
};
use crate::error::{BlobStoreError, DocumentStoreError};

/// Document store over nested in-memory maps
#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, BTreeMap<String, Value>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document under a fixed id
    pub async fn insert(&self, path: &DocumentPath, data: Value) {
        let mut collections = self.collections.write().await;
        collections
            .entry(path.parent().as_str().to_string())
            .or_default()
            .insert(path.id().to_string(), data);
    }

    /// Current payload of a document, if present
    pub async fn document(&self, path: &DocumentPath) -> Option<Value> {
        let collections = self.collections.read().await;
        collections
            .get(path.parent().as_str())
            .and_then(|documents| documents.get(path.id()))
            .cloned()
    }

    /// Number of documents in a collection
    pub async fn count(&self, path: &CollectionPath) -> usize {
        let collections = self.collections.read().await;
        collections
            .get(path.as_str())
            .map_or(0, |documents| documents.len())
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn query(
        &self,
        path: &CollectionPath,
        constraints: &[Constraint],
    ) -> DocumentResult<Vec<Document>> {
        let collections = self.collections.read().await;
        let documents = collections
            .get(path.as_str())
            .map(|documents| {
                documents
                    .iter()
                    .map(|(id, data)| Document {
                        id: id.clone(),
                        data: data.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(apply_constraints(documents, constraints))
    }

    async fn get(&self, path: &DocumentPath) -> DocumentResult<Option<Document>> {
        let collections = self.collections.read().await;
        let document = collections
            .get(path.parent().as_str())
            .and_then(|documents| documents.get(path.id()))
            .map(|data| Document {
                id: path.id().to_string(),
                data: data.clone(),
            });

        Ok(document)
    }

    async fn create(&self, path: &CollectionPath, data: &Value) -> DocumentResult<String> {
        let id = Uuid::new_v4().to_string();
        let mut collections = self.collections.write().await;
        collections
            .entry(path.as_str().to_string())
            .or_default()
            .insert(id.clone(), data.clone());

        Ok(id)
    }

    async fn update(&self, path: &DocumentPath, data: &Value) -> DocumentResult<()> {
        let mut collections = self.collections.write().await;
        let slot = collections
            .get_mut(path.parent().as_str())
            .and_then(|documents| documents.get_mut(path.id()))
            .ok_or_else(|| DocumentStoreError::NotFound(path.as_str().to_string()))?;

        *slot = data.clone();
        Ok(())
    }

    async fn delete(&self, path: &DocumentPath) -> DocumentResult<()> {
        let mut collections = self.collections.write().await;
        if let Some(documents) = collections.get_mut(path.parent().as_str()) {
            documents.remove(path.id());
        }

        Ok(())
    }
}

/// A blob held by [`MemoryBlobStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryBlob {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Blob store over an in-memory map
pub struct MemoryBlobStore {
    base_url: String,
    objects: RwLock<HashMap<String, MemoryBlob>>,
}

impl MemoryBlobStore {
    /// Create a store whose uploads resolve under `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            objects: RwLock::new(HashMap::new()),
        }
    }

    /// Stored blob at `path`, if present
    pub async fn blob(&self, path: &str) -> Option<MemoryBlob> {
        let objects = self.objects.read().await;
        objects.get(path.trim_start_matches('/')).cloned()
    }

    /// Whether a blob is stored at `path`
    pub async fn contains(&self, path: &str) -> bool {
        let objects = self.objects.read().await;
        objects.contains_key(path.trim_start_matches('/'))
    }

    /// Number of stored blobs
    pub async fn count(&self) -> usize {
        let objects = self.objects.read().await;
        objects.len()
    }
}

impl Default for MemoryBlobStore {
    fn default() -> Self {
        Self::new("https://blobs.invalid")
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn upload(&self, path: &str, data_url: &str) -> BlobResult<String> {
        let payload = DataUrl::parse(data_url)?;
        let key = path.trim_start_matches('/').to_string();
        let mut objects = self.objects.write().await;
        objects.insert(
            key.clone(),
            MemoryBlob {
                content_type: payload.content_type,
                bytes: payload.bytes,
            },
        );

        Ok(format!("{}/{}", self.base_url, key))
    }

    fn resolve_path(&self, url: &str) -> BlobResult<String> {
        let trimmed = url.split_once('?').map_or(url, |(head, _)| head);
        trimmed
            .strip_prefix(&self.base_url)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|key| !key.is_empty())
            .map(str::to_string)
            .ok_or_else(|| BlobStoreError::ForeignUrl(url.to_string()))
    }

    async fn delete(&self, path: &str) -> BlobResult<()> {
        let mut objects = self.objects.write().await;
        objects.remove(path.trim_start_matches('/'));

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Comparison, SortDirection};
    use serde_json::json;

    fn products() -> CollectionPath {
        CollectionPath::parse("users/u-1/products").unwrap()
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let store = MemoryDocumentStore::new();
        let id = store
            .create(&products(), &json!({"name": "Desk"}))
            .await
            .unwrap();

        let path = products().doc(&id).unwrap();
        let document = store.get(&path).await.unwrap().unwrap();
        assert_eq!(document.id, id);
        assert_eq!(document.data, json!({"name": "Desk"}));
    }

    #[tokio::test]
    async fn query_applies_filter_and_order() {
        let store = MemoryDocumentStore::new();
        for (id, units) in [("a", 10), ("b", 50), ("c", 35)] {
            store
                .insert(
                    &products().doc(id).unwrap(),
                    json!({"soldUnits": units}),
                )
                .await;
        }

        let constraints = [
            Constraint::order_by("soldUnits", SortDirection::Descending),
            Constraint::where_field("soldUnits", Comparison::GreaterThan, 30),
        ];
        let documents = store.query(&products(), &constraints).await.unwrap();
        let ids: Vec<&str> = documents.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[tokio::test]
    async fn update_of_missing_document_is_not_found() {
        let store = MemoryDocumentStore::new();
        let path = products().doc("ghost").unwrap();
        let result = store.update(&path, &json!({})).await;
        assert!(matches!(result, Err(DocumentStoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn delete_of_missing_document_is_silent() {
        let store = MemoryDocumentStore::new();
        let path = products().doc("ghost").unwrap();
        store.delete(&path).await.unwrap();
    }

    #[tokio::test]
    async fn uploaded_blob_resolves_back_to_its_path() {
        let store = MemoryBlobStore::new("https://cdn.test");
        let url = store
            .upload("u-1/1700.png", "data:image/png;base64,aGk=")
            .await
            .unwrap();

        assert_eq!(url, "https://cdn.test/u-1/1700.png");
        assert_eq!(store.resolve_path(&url).unwrap(), "u-1/1700.png");
        let blob = store.blob("u-1/1700.png").await.unwrap();
        assert_eq!(blob.content_type, "image/png");
        assert_eq!(blob.bytes, b"hi");
    }

    #[tokio::test]
    async fn foreign_url_does_not_resolve() {
        let store = MemoryBlobStore::new("https://cdn.test");
        let result = store.resolve_path("https://elsewhere.test/u-1/1700.png");
        assert!(matches!(result, Err(BlobStoreError::ForeignUrl(_))));

        // A host that merely extends the base string is still foreign.
        let result = store.resolve_path("https://cdn.testify.dev/u-1/1700.png");
        assert!(matches!(result, Err(BlobStoreError::ForeignUrl(_))));
    }

    #[tokio::test]
    async fn blob_delete_is_idempotent() {
        let store = MemoryBlobStore::new("https://cdn.test");
        store
            .upload("u-1/1700.png", "data:image/png;base64,aGk=")
            .await
            .unwrap();

        store.delete("u-1/1700.png").await.unwrap();
        store.delete("u-1/1700.png").await.unwrap();
        assert_eq!(store.count().await, 0);
    }
}
