//! Postgres-backed document store
//!
//! Documents live in a single `documents` table keyed by
//! `(collection, id)` with the payload stored as JSONB. Query
//! constraints are pushed down into SQL; field names are restricted to
//! bare identifiers before they are rendered into a statement.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use crate::document::{
    CollectionPath, Comparison, Constraint, Document, DocumentPath, DocumentResult, DocumentStore,
    SortDirection,
};
use crate::error::DocumentStoreError;

/// Document store over a PostgreSQL JSONB table
#[derive(Clone)]
pub struct PostgresDocumentStore {
    pool: PgPool,
}

#[derive(Debug, PartialEq)]
enum BindValue {
    Number(f64),
    Text(String),
    Bool(bool),
}

fn sql_op(op: Comparison) -> &'static str {
    match op {
        Comparison::LessThan => "<",
        Comparison::LessThanOrEqual => "<=",
        Comparison::Equal => "=",
        Comparison::NotEqual => "<>",
        Comparison::GreaterThanOrEqual => ">=",
        Comparison::GreaterThan => ">",
    }
}

fn ensure_bare_identifier(field: &str) -> DocumentResult<()> {
    let bare = !field.is_empty()
        && field
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if bare {
        Ok(())
    } else {
        Err(DocumentStoreError::InvalidConstraint(format!(
            "field name must be a bare identifier: {field:?}"
        )))
    }
}

/// Render constraints into a SQL suffix (predicates ANDed onto the
/// collection match, ordering appended last) plus the bind values, with
/// `$1` already taken by the collection
fn render_constraints(constraints: &[Constraint]) -> DocumentResult<(String, Vec<BindValue>)> {
    let mut predicates = String::new();
    let mut order_clauses: Vec<String> = Vec::new();
    let mut binds = Vec::new();

    for constraint in constraints {
        match constraint {
            Constraint::Where { field, op, value } => {
                ensure_bare_identifier(field)?;
                let placeholder = binds.len() + 2;
                let clause = match value {
                    Value::Number(n) => {
                        let n = n.as_f64().ok_or_else(|| {
                            DocumentStoreError::InvalidConstraint(format!(
                                "numeric predicate out of range: {n}"
                            ))
                        })?;
                        binds.push(BindValue::Number(n));
                        format!("(data->>'{field}')::float8 {} ${placeholder}", sql_op(*op))
                    }
                    Value::String(s) => {
                        binds.push(BindValue::Text(s.clone()));
                        format!("data->>'{field}' {} ${placeholder}", sql_op(*op))
                    }
                    Value::Bool(b) => {
                        binds.push(BindValue::Bool(*b));
                        format!("(data->>'{field}')::boolean {} ${placeholder}", sql_op(*op))
                    }
                    other => {
                        return Err(DocumentStoreError::InvalidConstraint(format!(
                            "unsupported predicate value: {other}"
                        )));
                    }
                };
                predicates.push_str(" AND ");
                predicates.push_str(&clause);
            }
            Constraint::OrderBy { field, direction } => {
                ensure_bare_identifier(field)?;
                let dir = match direction {
                    SortDirection::Ascending => "ASC",
                    SortDirection::Descending => "DESC",
                };
                // JSONB ordering compares numbers numerically; NULLS
                // LAST keeps documents without the field at the end,
                // matching the in-memory evaluator.
                order_clauses.push(format!("data->'{field}' {dir} NULLS LAST"));
            }
        }
    }

    let mut suffix = predicates;
    if !order_clauses.is_empty() {
        suffix.push_str(" ORDER BY ");
        suffix.push_str(&order_clauses.join(", "));
    }
    Ok((suffix, binds))
}

impl PostgresDocumentStore {
    /// Create a new store over an initialized pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the backing table if it does not exist yet
    pub async fn ensure_schema(&self) -> DocumentResult<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS documents (
                collection TEXT NOT NULL,
                id TEXT NOT NULL,
                data JSONB NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                PRIMARY KEY (collection, id)
            )",
        )
        .execute(&self.pool)
        .await?;

        info!("Document table ready");
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    async fn query(
        &self,
        path: &CollectionPath,
        constraints: &[Constraint],
    ) -> DocumentResult<Vec<Document>> {
        let (suffix, binds) = render_constraints(constraints)?;
        let sql = format!("SELECT id, data FROM documents WHERE collection = $1{suffix}");

        let mut query = sqlx::query(&sql).bind(path.as_str());
        for bind in &binds {
            query = match bind {
                BindValue::Number(n) => query.bind(n),
                BindValue::Text(t) => query.bind(t),
                BindValue::Bool(b) => query.bind(b),
            };
        }

        let rows = query.fetch_all(&self.pool).await?;
        let documents = rows
            .into_iter()
            .map(|row| Document {
                id: row.get("id"),
                data: row.get("data"),
            })
            .collect();

        Ok(documents)
    }

    async fn get(&self, path: &DocumentPath) -> DocumentResult<Option<Document>> {
        let collection = path.parent();
        let row = sqlx::query("SELECT id, data FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection.as_str())
            .bind(path.id())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| Document {
            id: row.get("id"),
            data: row.get("data"),
        }))
    }

    async fn create(&self, path: &CollectionPath, data: &Value) -> DocumentResult<String> {
        let id = Uuid::new_v4().to_string();
        sqlx::query("INSERT INTO documents (collection, id, data) VALUES ($1, $2, $3)")
            .bind(path.as_str())
            .bind(&id)
            .bind(data)
            .execute(&self.pool)
            .await?;

        Ok(id)
    }

    async fn update(&self, path: &DocumentPath, data: &Value) -> DocumentResult<()> {
        let collection = path.parent();
        let result = sqlx::query(
            "UPDATE documents SET data = $3, updated_at = now()
             WHERE collection = $1 AND id = $2",
        )
        .bind(collection.as_str())
        .bind(path.id())
        .bind(data)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DocumentStoreError::NotFound(path.as_str().to_string()));
        }
        Ok(())
    }

    async fn delete(&self, path: &DocumentPath) -> DocumentResult<()> {
        let collection = path.parent();
        sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection.as_str())
            .bind(path.id())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
