use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

use crate::application::ports::{LogQuery, LogRepository, RepositoryError};
use crate::domain::entities::ActionLog;

pub struct PostgresLogRepository {
    pool: PgPool,
}

impl PostgresLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LogRepository for PostgresLogRepository {
    async fn fetch_logs(&self, query: &LogQuery) -> Result<Vec<ActionLog>, RepositoryError> {
        // An empty action list means everything was blacklisted.
        if query.actions.as_ref().is_some_and(|actions| actions.is_empty()) {
            return Ok(Vec::new());
        }

        let sql = format!(
            r#"
            SELECT log_id, name, data, encode(txid, 'hex') AS txid, created_at_block, created_at_time
            FROM contract_logs
            WHERE contract = $1 AND relation_name = $2 AND relation_id = $3
                AND ($4::text[] IS NULL OR name = ANY($4))
            ORDER BY log_id {}
            LIMIT $5 OFFSET $6
            "#,
            query.order.as_sql()
        );

        let rows = sqlx::query_as::<_, LogRow>(&sql)
            .bind(&query.contract)
            .bind(query.relation_name)
            .bind(query.relation_id.to_string())
            .bind(query.actions.as_deref())
            .bind(query.pagination.limit())
            .bind(query.pagination.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(LogRow::into_domain).collect())
    }
}

#[derive(sqlx::FromRow)]
struct LogRow {
    log_id: i64,
    name: String,
    data: Value,
    txid: String,
    created_at_block: i64,
    created_at_time: i64,
}

impl LogRow {
    fn into_domain(self) -> ActionLog {
        ActionLog {
            log_id: self.log_id.to_string(),
            name: self.name,
            data: self.data,
            txid: self.txid,
            created_at_block: self.created_at_block.to_string(),
            created_at_time: self.created_at_time.to_string(),
        }
    }
}
