use async_trait::async_trait;
use thiserror::Error;

use crate::application::query::SqlValue;
#[cfg(test)]
use mockall::automock;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Runs statements produced by the query builder.
///
/// Values are bound positionally in slice order; `$n` in `sql` refers to
/// `values[n - 1]`.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// First column of every row, as a 64-bit id
    async fn fetch_ids(&self, sql: &str, values: &[SqlValue]) -> Result<Vec<i64>, RepositoryError>;

    /// Single `counter` column of a count statement
    async fn fetch_count(&self, sql: &str, values: &[SqlValue]) -> Result<i64, RepositoryError>;
}
