//! Custom error types for the store abstractions
//!
//! Typed errors for the document and blob stores. Display output stays
//! close to the raw backend message because callers surface these
//! strings to the user verbatim.

use thiserror::Error;

/// Errors produced while constructing store paths
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// Path string was empty
    #[error("path must not be empty")]
    Empty,

    /// A segment between separators was empty or contained a separator
    #[error("invalid path segment in {0:?}")]
    InvalidSegment(String),

    /// Even number of segments where a collection path was expected
    #[error("not a collection path: {0:?}")]
    NotACollection(String),

    /// Odd number of segments where a document path was expected
    #[error("not a document path: {0:?}")]
    NotADocument(String),
}

/// Errors produced by document store implementations
#[derive(Error, Debug)]
pub enum DocumentStoreError {
    /// The addressed document does not exist
    #[error("no document at {0}")]
    NotFound(String),

    /// A query constraint could not be applied by the backend
    #[error("unsupported constraint: {0}")]
    InvalidConstraint(String),

    /// Underlying database failure
    #[error("{0}")]
    Database(#[from] sqlx::Error),

    /// The backend could not be reached or refused the operation
    #[error("{0}")]
    Unavailable(String),
}

/// Errors produced by blob store implementations
#[derive(Error, Debug)]
pub enum BlobStoreError {
    /// Upload payload was not a usable data-URL
    #[error("invalid data url: {0}")]
    InvalidDataUrl(String),

    /// The URL does not address a blob in this store
    #[error("url does not belong to this store: {0}")]
    ForeignUrl(String),

    /// The storage backend rejected or failed the operation
    #[error("{0}")]
    Storage(String),
}
