use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::entities::Asset;
#[cfg(test)]
use mockall::automock;

/// Read path for authoritative asset state, shared by the REST handlers and
/// the notification channel.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AssetRepository: Send + Sync {
    /// Assets for `ids`. Order of the result is unspecified and missing ids
    /// are simply absent.
    async fn fetch_by_ids(&self, contract: &str, ids: &[i64]) -> Result<Vec<Asset>, RepositoryError>;

    /// Position of the asset among assets of the same template, or `None`
    /// when the asset does not exist.
    async fn template_mint(&self, contract: &str, asset_id: i64) -> Result<Option<i64>, RepositoryError>;
}
