use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::entities::ActionLog;
use crate::domain::value_objects::{Pagination, SortOrder};
#[cfg(test)]
use mockall::automock;

/// Action log lookup for one entity.
#[derive(Debug, Clone, PartialEq)]
pub struct LogQuery {
    pub contract: String,
    /// Entity kind the logs were recorded against (`asset`, `sale`)
    pub relation_name: &'static str,
    pub relation_id: i64,
    /// Restrict to these action names; `None` returns every action
    pub actions: Option<Vec<String>>,
    pub pagination: Pagination,
    pub order: SortOrder,
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait LogRepository: Send + Sync {
    async fn fetch_logs(&self, query: &LogQuery) -> Result<Vec<ActionLog>, RepositoryError>;
}
