use async_trait::async_trait;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Row};

use crate::application::ports::{QueryExecutor, RepositoryError};
use crate::application::query::SqlValue;

/// Runs builder-produced statements against Postgres.
pub struct PgQueryExecutor {
    pool: PgPool,
}

impl PgQueryExecutor {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn bind_values<'q>(sql: &'q str, values: &'q [SqlValue]) -> Query<'q, Postgres, PgArguments> {
    values.iter().fold(sqlx::query(sql), |query, value| match value {
        SqlValue::Int(v) => query.bind(*v),
        SqlValue::Float(v) => query.bind(*v),
        SqlValue::Text(v) => query.bind(v.as_str()),
        SqlValue::Bool(v) => query.bind(*v),
        SqlValue::IntList(v) => query.bind(v.as_slice()),
        SqlValue::TextList(v) => query.bind(v.as_slice()),
        SqlValue::Json(v) => query.bind(Json(v)),
    })
}

#[async_trait]
impl QueryExecutor for PgQueryExecutor {
    async fn fetch_ids(&self, sql: &str, values: &[SqlValue]) -> Result<Vec<i64>, RepositoryError> {
        let rows: Vec<PgRow> = bind_values(sql, values).fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| row.try_get::<i64, _>(0).map_err(RepositoryError::from))
            .collect()
    }

    async fn fetch_count(&self, sql: &str, values: &[SqlValue]) -> Result<i64, RepositoryError> {
        let row = bind_values(sql, values).fetch_one(&self.pool).await?;

        Ok(row.try_get::<i64, _>("counter")?)
    }
}
