use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::entities::Sale;
#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait SaleRepository: Send + Sync {
    async fn fetch_by_ids(&self, market_contract: &str, ids: &[i64]) -> Result<Vec<Sale>, RepositoryError>;
}
