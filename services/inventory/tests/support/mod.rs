//! Test doubles shared by the integration tests
//!
//! The recording stores wrap the in-memory adapters from `common`,
//! counting every call and optionally failing whole operation classes
//! with a chosen message.

use async_trait::async_trait;
use common::blob::{BlobResult, BlobStore};
use common::document::{
    CollectionPath, Constraint, Document, DocumentPath, DocumentResult, DocumentStore,
};
use common::error::{BlobStoreError, DocumentStoreError};
use common::memory::{MemoryBlobStore, MemoryDocumentStore};
use inventory::feedback::{ConfirmRequest, FeedbackPort, ImagePicker, Toast};
use inventory::models::Product;
use inventory::session::SessionUser;
use serde_json::Value;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub const BASE_URL: &str = "https://cdn.test";
pub const DATA_URL: &str = "data:image/png;base64,aGk=";

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

pub fn test_user() -> SessionUser {
    SessionUser::new("u-test")
}

/// A product whose image URL resolves under [`BASE_URL`]
pub fn product(id: &str, name: &str, price: f64, sold_units: i64) -> Product {
    Product {
        id: id.to_string(),
        image: format!("{BASE_URL}/u-test/{id}.png"),
        name: name.to_string(),
        price,
        sold_units,
    }
}

#[derive(Debug, Default, Clone)]
pub struct StoreCalls {
    pub queries: usize,
    pub creates: Vec<(String, Value)>,
    pub updates: Vec<(String, Value)>,
    pub deletes: Vec<String>,
}

impl StoreCalls {
    pub fn mutations(&self) -> usize {
        self.creates.len() + self.updates.len() + self.deletes.len()
    }
}

/// Document store wrapper that records calls and can be told to fail
#[derive(Default)]
pub struct RecordingDocumentStore {
    pub inner: MemoryDocumentStore,
    calls: Mutex<StoreCalls>,
    fail_query: Mutex<Option<String>>,
    fail_create: Mutex<Option<String>>,
    fail_update: Mutex<Option<String>>,
    fail_delete: Mutex<Option<String>>,
}

impl RecordingDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> StoreCalls {
        self.calls.lock().unwrap().clone()
    }

    pub fn fail_queries(&self, message: &str) {
        *self.fail_query.lock().unwrap() = Some(message.to_string());
    }

    pub fn fail_creates(&self, message: &str) {
        *self.fail_create.lock().unwrap() = Some(message.to_string());
    }

    pub fn fail_updates(&self, message: &str) {
        *self.fail_update.lock().unwrap() = Some(message.to_string());
    }

    pub fn fail_deletes(&self, message: &str) {
        *self.fail_delete.lock().unwrap() = Some(message.to_string());
    }
}

#[async_trait]
impl DocumentStore for RecordingDocumentStore {
    async fn query(
        &self,
        path: &CollectionPath,
        constraints: &[Constraint],
    ) -> DocumentResult<Vec<Document>> {
        self.calls.lock().unwrap().queries += 1;
        let failure = self.fail_query.lock().unwrap().clone();
        if let Some(message) = failure {
            return Err(DocumentStoreError::Unavailable(message));
        }
        self.inner.query(path, constraints).await
    }

    async fn get(&self, path: &DocumentPath) -> DocumentResult<Option<Document>> {
        self.inner.get(path).await
    }

    async fn create(&self, path: &CollectionPath, data: &Value) -> DocumentResult<String> {
        self.calls
            .lock()
            .unwrap()
            .creates
            .push((path.as_str().to_string(), data.clone()));
        let failure = self.fail_create.lock().unwrap().clone();
        if let Some(message) = failure {
            return Err(DocumentStoreError::Unavailable(message));
        }
        self.inner.create(path, data).await
    }

    async fn update(&self, path: &DocumentPath, data: &Value) -> DocumentResult<()> {
        self.calls
            .lock()
            .unwrap()
            .updates
            .push((path.as_str().to_string(), data.clone()));
        let failure = self.fail_update.lock().unwrap().clone();
        if let Some(message) = failure {
            return Err(DocumentStoreError::Unavailable(message));
        }
        self.inner.update(path, data).await
    }

    async fn delete(&self, path: &DocumentPath) -> DocumentResult<()> {
        self.calls
            .lock()
            .unwrap()
            .deletes
            .push(path.as_str().to_string());
        let failure = self.fail_delete.lock().unwrap().clone();
        if let Some(message) = failure {
            return Err(DocumentStoreError::Unavailable(message));
        }
        self.inner.delete(path).await
    }
}

#[derive(Debug, Default, Clone)]
pub struct BlobCalls {
    pub uploads: Vec<(String, String)>,
    pub deletes: Vec<String>,
}

/// Blob store wrapper that records calls and can be told to fail
pub struct RecordingBlobStore {
    pub inner: MemoryBlobStore,
    calls: Mutex<BlobCalls>,
    fail_upload: Mutex<Option<String>>,
    fail_delete: Mutex<Option<String>>,
}

impl RecordingBlobStore {
    pub fn new(base_url: &str) -> Self {
        Self {
            inner: MemoryBlobStore::new(base_url),
            calls: Mutex::default(),
            fail_upload: Mutex::default(),
            fail_delete: Mutex::default(),
        }
    }

    /// Store a blob without recording the call
    pub async fn seed(&self, path: &str, data_url: &str) -> String {
        self.inner.upload(path, data_url).await.unwrap()
    }

    pub fn calls(&self) -> BlobCalls {
        self.calls.lock().unwrap().clone()
    }

    pub fn fail_uploads(&self, message: &str) {
        *self.fail_upload.lock().unwrap() = Some(message.to_string());
    }

    pub fn fail_deletes(&self, message: &str) {
        *self.fail_delete.lock().unwrap() = Some(message.to_string());
    }
}

#[async_trait]
impl BlobStore for RecordingBlobStore {
    async fn upload(&self, path: &str, data_url: &str) -> BlobResult<String> {
        self.calls
            .lock()
            .unwrap()
            .uploads
            .push((path.to_string(), data_url.to_string()));
        let failure = self.fail_upload.lock().unwrap().clone();
        if let Some(message) = failure {
            return Err(BlobStoreError::Storage(message));
        }
        self.inner.upload(path, data_url).await
    }

    fn resolve_path(&self, url: &str) -> BlobResult<String> {
        self.inner.resolve_path(url)
    }

    async fn delete(&self, path: &str) -> BlobResult<()> {
        self.calls.lock().unwrap().deletes.push(path.to_string());
        let failure = self.fail_delete.lock().unwrap().clone();
        if let Some(message) = failure {
            return Err(BlobStoreError::Storage(message));
        }
        self.inner.delete(path).await
    }
}

#[derive(Debug, Default, Clone)]
pub struct FeedbackState {
    pub toasts: Vec<Toast>,
    pub confirms: Vec<ConfirmRequest>,
    pub loading_presented: usize,
    pub loading_dismissed: usize,
}

/// Feedback port that records everything and answers confirms with a
/// preset choice
pub struct RecordingFeedback {
    state: Mutex<FeedbackState>,
    confirm_answer: bool,
}

impl RecordingFeedback {
    pub fn confirming() -> Self {
        Self::answering(true)
    }

    pub fn declining() -> Self {
        Self::answering(false)
    }

    pub fn answering(confirm_answer: bool) -> Self {
        Self {
            state: Mutex::default(),
            confirm_answer,
        }
    }

    pub fn state(&self) -> FeedbackState {
        self.state.lock().unwrap().clone()
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.state().toasts
    }
}

#[async_trait]
impl FeedbackPort for RecordingFeedback {
    fn toast(&self, toast: Toast) {
        self.state.lock().unwrap().toasts.push(toast);
    }

    async fn confirm(&self, request: ConfirmRequest) -> bool {
        self.state.lock().unwrap().confirms.push(request);
        self.confirm_answer
    }

    async fn present_loading(&self) {
        self.state.lock().unwrap().loading_presented += 1;
    }

    async fn dismiss_loading(&self) {
        self.state.lock().unwrap().loading_dismissed += 1;
    }
}

/// Image picker that always answers with the same choice
pub struct StubPicker {
    image: Option<String>,
}

impl StubPicker {
    pub fn returning(data_url: &str) -> Self {
        Self {
            image: Some(data_url.to_string()),
        }
    }

    pub fn cancelled() -> Self {
        Self { image: None }
    }
}

#[async_trait]
impl ImagePicker for StubPicker {
    async fn take_picture(&self, _prompt: &str) -> Option<String> {
        self.image.clone()
    }
}
