//! Error types for the inventory screens
//!
//! Controller errors stay transparent over their causes so the message
//! shown to the user is the message the failing layer produced.

use common::error::{BlobStoreError, DocumentStoreError, PathError};
use thiserror::Error;

use crate::validation::ValidationErrors;

/// Result type alias for inventory operations
pub type InventoryResult<T> = Result<T, InventoryError>;

/// Errors surfaced by the inventory controllers
#[derive(Error, Debug)]
pub enum InventoryError {
    /// The form did not pass validation
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// The document store failed or rejected an operation
    #[error(transparent)]
    Store(#[from] DocumentStoreError),

    /// The blob store failed or rejected an operation
    #[error(transparent)]
    Blob(#[from] BlobStoreError),

    /// A storage path could not be built
    #[error(transparent)]
    Path(#[from] PathError),

    /// A payload could not be encoded for storage
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}
