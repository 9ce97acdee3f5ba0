//! Document store abstraction
//!
//! Documents live under hierarchical slash-separated paths: an odd
//! number of segments addresses a collection (`users/u1/products`), an
//! even number a single document (`users/u1/products/p1`). Queries take
//! a list of constraints mixing comparison predicates with ordering,
//! matching the query surface of the cloud document database the
//! records originate from.

use std::cmp::Ordering;
use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DocumentStoreError, PathError};

/// Type alias for Result with DocumentStoreError
pub type DocumentResult<T> = Result<T, DocumentStoreError>;

/// Path addressing a collection of documents
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionPath(String);

/// Path addressing a single document
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentPath(String);

fn split_segments(path: &str) -> Result<Vec<&str>, PathError> {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        return Err(PathError::Empty);
    }
    let segments: Vec<&str> = trimmed.split('/').collect();
    if segments.iter().any(|segment| segment.is_empty()) {
        return Err(PathError::InvalidSegment(path.to_string()));
    }
    Ok(segments)
}

impl CollectionPath {
    /// Parse a collection path, requiring an odd number of segments
    pub fn parse(path: impl AsRef<str>) -> Result<Self, PathError> {
        let path = path.as_ref();
        let segments = split_segments(path)?;
        if segments.len() % 2 == 0 {
            return Err(PathError::NotACollection(path.to_string()));
        }
        Ok(Self(segments.join("/")))
    }

    /// Address a document inside this collection
    pub fn doc(&self, id: &str) -> Result<DocumentPath, PathError> {
        if id.is_empty() || id.contains('/') {
            return Err(PathError::InvalidSegment(id.to_string()));
        }
        Ok(DocumentPath(format!("{}/{}", self.0, id)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl DocumentPath {
    /// Parse a document path, requiring an even number of segments
    pub fn parse(path: impl AsRef<str>) -> Result<Self, PathError> {
        let path = path.as_ref();
        let segments = split_segments(path)?;
        if segments.len() % 2 != 0 {
            return Err(PathError::NotADocument(path.to_string()));
        }
        Ok(Self(segments.join("/")))
    }

    /// The collection this document belongs to
    pub fn parent(&self) -> CollectionPath {
        match self.0.rsplit_once('/') {
            Some((collection, _)) => CollectionPath(collection.to_string()),
            // Document paths always carry at least two segments.
            None => CollectionPath(self.0.clone()),
        }
    }

    /// The final segment, i.e. the document id
    pub fn id(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Comparison operator for `Constraint::Where`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    LessThan,
    LessThanOrEqual,
    Equal,
    NotEqual,
    GreaterThanOrEqual,
    GreaterThan,
}

/// Sort order for `Constraint::OrderBy`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// A single query constraint: a field predicate or an ordering
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    Where {
        field: String,
        op: Comparison,
        value: Value,
    },
    OrderBy {
        field: String,
        direction: SortDirection,
    },
}

impl Constraint {
    /// Predicate constraint on a document field
    pub fn where_field(field: impl Into<String>, op: Comparison, value: impl Into<Value>) -> Self {
        Self::Where {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    /// Ordering constraint on a document field
    pub fn order_by(field: impl Into<String>, direction: SortDirection) -> Self {
        Self::OrderBy {
            field: field.into(),
            direction,
        }
    }
}

/// A stored document: backend-assigned id plus JSON payload
///
/// The id is not duplicated inside `data`; callers that need it in the
/// record merge it back after reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

/// Hierarchical document database interface
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Run a filtered, ordered query over a collection, returning the
    /// current snapshot
    async fn query(
        &self,
        path: &CollectionPath,
        constraints: &[Constraint],
    ) -> DocumentResult<Vec<Document>>;

    /// Fetch a single document
    async fn get(&self, path: &DocumentPath) -> DocumentResult<Option<Document>>;

    /// Create a document with a store-assigned id, returning the id
    async fn create(&self, path: &CollectionPath, data: &Value) -> DocumentResult<String>;

    /// Replace the payload of an existing document
    async fn update(&self, path: &DocumentPath, data: &Value) -> DocumentResult<()>;

    /// Delete a document; deleting an absent document is not an error
    async fn delete(&self, path: &DocumentPath) -> DocumentResult<()>;
}

fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => {
            let a = a.as_f64()?;
            let b = b.as_f64()?;
            Some(a.total_cmp(&b))
        }
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

fn satisfies(actual: &Value, op: Comparison, expected: &Value) -> bool {
    let Some(ord) = compare_values(actual, expected) else {
        // Values of different kinds only satisfy a NotEqual predicate.
        return op == Comparison::NotEqual;
    };
    match op {
        Comparison::LessThan => ord == Ordering::Less,
        Comparison::LessThanOrEqual => ord != Ordering::Greater,
        Comparison::Equal => ord == Ordering::Equal,
        Comparison::NotEqual => ord != Ordering::Equal,
        Comparison::GreaterThanOrEqual => ord != Ordering::Less,
        Comparison::GreaterThan => ord == Ordering::Greater,
    }
}

/// Evaluate query constraints against an in-memory document set
///
/// `Where` keeps documents whose field satisfies the predicate; a
/// document without the field is excluded. `OrderBy` sorts stably;
/// documents without the field sort after those that have it,
/// regardless of direction.
pub fn apply_constraints(mut docs: Vec<Document>, constraints: &[Constraint]) -> Vec<Document> {
    for constraint in constraints {
        match constraint {
            Constraint::Where { field, op, value } => {
                docs.retain(|doc| {
                    doc.data
                        .get(field)
                        .map(|actual| satisfies(actual, *op, value))
                        .unwrap_or(false)
                });
            }
            Constraint::OrderBy { field, direction } => {
                docs.sort_by(|a, b| {
                    match (a.data.get(field), b.data.get(field)) {
                        (Some(a), Some(b)) => {
                            let ord = compare_values(a, b).unwrap_or(Ordering::Equal);
                            match direction {
                                SortDirection::Ascending => ord,
                                SortDirection::Descending => ord.reverse(),
                            }
                        }
                        (Some(_), None) => Ordering::Less,
                        (None, Some(_)) => Ordering::Greater,
                        (None, None) => Ordering::Equal,
                    }
                });
            }
        }
    }
    docs
}
