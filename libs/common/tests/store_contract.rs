//! Integration tests for the storage contracts
//!
//! These tests exercise the document and blob store traits end to end
//! through trait objects, the way application code consumes them. They
//! run against the in-memory adapters so no external services are
//! required.

use common::{
    blob::BlobStore,
    document::{CollectionPath, Comparison, Constraint, DocumentStore, SortDirection},
    memory::{MemoryBlobStore, MemoryDocumentStore},
};
use serde_json::json;
use std::sync::Arc;

/// Test that a document travels through the full create, query, update
/// and delete lifecycle
#[tokio::test]
async fn test_document_lifecycle() -> Result<(), Box<dyn std::error::Error>> {
    let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new());
    let products = CollectionPath::parse("users/u-1/products")?;

    // Create a document and read it back by id
    let id = store
        .create(&products, &json!({"name": "Desk", "soldUnits": 42}))
        .await?;
    let path = products.doc(&id)?;
    let fetched = store.get(&path).await?;
    assert!(fetched.is_some(), "Created document not found");

    // The document shows up in a constrained query
    let constraints = [
        Constraint::where_field("soldUnits", Comparison::GreaterThan, 30),
        Constraint::order_by("soldUnits", SortDirection::Descending),
    ];
    let documents = store.query(&products, &constraints).await?;
    assert_eq!(documents.len(), 1, "Constrained query missed the document");
    assert_eq!(documents[0].id, id);

    // Update replaces the payload wholesale
    store
        .update(&path, &json!({"name": "Standing desk", "soldUnits": 42}))
        .await?;
    let updated = store.get(&path).await?.ok_or("document vanished")?;
    assert_eq!(updated.data["name"], "Standing desk");

    // Delete removes it; a second delete is a no-op
    store.delete(&path).await?;
    assert!(store.get(&path).await?.is_none(), "Delete left the document");
    store.delete(&path).await?;

    Ok(())
}

/// Test that an uploaded blob is reachable through its public URL and
/// resolvable back to its storage path
#[tokio::test]
async fn test_blob_lifecycle() -> Result<(), Box<dyn std::error::Error>> {
    let store: Arc<dyn BlobStore> = Arc::new(MemoryBlobStore::new("https://cdn.test"));

    // Upload a data URL and get a public URL back
    let url = store
        .upload("u-1/1700000000000", "data:image/png;base64,aGk=")
        .await?;
    assert_eq!(url, "https://cdn.test/u-1/1700000000000");

    // The public URL resolves back to the storage path
    let path = store.resolve_path(&url)?;
    assert_eq!(path, "u-1/1700000000000");

    // Delete through the resolved path, then once more
    store.delete(&path).await?;
    store.delete(&path).await?;

    Ok(())
}
