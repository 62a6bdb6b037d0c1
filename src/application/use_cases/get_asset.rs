use std::sync::Arc;

use crate::application::dto::{AssetRecord, AssetStats};
use crate::application::errors::UseCaseError;
use crate::application::filler::{Filled, ResultFiller};
use crate::application::ports::AssetRepository;
use crate::application::validation::parse_id;

/// Use case: single asset by id
pub struct GetAssetUseCase {
    filler: Arc<ResultFiller>,
}

impl GetAssetUseCase {
    pub fn new(filler: Arc<ResultFiller>) -> Self {
        Self { filler }
    }

    pub async fn execute(&self, asset_id: &str) -> Result<AssetRecord, UseCaseError> {
        let asset_id = parse_id("asset_id", asset_id)?;

        self.filler
            .fill_assets(&[asset_id])
            .await?
            .into_iter()
            .next()
            .and_then(Filled::found)
            .ok_or_else(|| UseCaseError::NotFound("Asset not found".to_string()))
    }
}

/// Use case: template mint position of an asset
pub struct AssetStatsUseCase {
    asset_repo: Arc<dyn AssetRepository>,
    contract: String,
}

impl AssetStatsUseCase {
    pub fn new(asset_repo: Arc<dyn AssetRepository>, contract: impl Into<String>) -> Self {
        Self {
            asset_repo,
            contract: contract.into(),
        }
    }

    pub async fn execute(&self, asset_id: &str) -> Result<AssetStats, UseCaseError> {
        let asset_id = parse_id("asset_id", asset_id)?;

        let template_mint = self
            .asset_repo
            .template_mint(&self.contract, asset_id)
            .await?
            .ok_or_else(|| UseCaseError::NotFound("Asset not found".to_string()))?;

        Ok(AssetStats {
            template_mint: template_mint.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockAssetRepository, MockSaleRepository};
    use crate::test_support::sample_asset;
    use mockall::predicate::*;

    fn filler(assets: MockAssetRepository) -> Arc<ResultFiller> {
        Arc::new(ResultFiller::new(
            Arc::new(assets),
            Arc::new(MockSaleRepository::new()),
            "atomicassets",
            "atomicmarket",
        ))
    }

    #[tokio::test]
    async fn test_get_asset_found() {
        let mut assets = MockAssetRepository::new();
        assets
            .expect_fetch_by_ids()
            .times(1)
            .returning(|_, _| Ok(vec![sample_asset(42)]));

        let record = GetAssetUseCase::new(filler(assets)).execute("42").await.unwrap();
        assert_eq!(record.asset_id, "42");
    }

    #[tokio::test]
    async fn test_get_asset_missing() {
        let mut assets = MockAssetRepository::new();
        assets.expect_fetch_by_ids().returning(|_, _| Ok(vec![]));

        let result = GetAssetUseCase::new(filler(assets)).execute("42").await;
        assert!(matches!(result, Err(UseCaseError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_get_asset_bad_id() {
        let result = GetAssetUseCase::new(filler(MockAssetRepository::new()))
            .execute("abc")
            .await;
        assert!(matches!(result, Err(UseCaseError::Arguments(_))));
    }

    #[tokio::test]
    async fn test_stats() {
        let mut assets = MockAssetRepository::new();
        assets
            .expect_template_mint()
            .with(eq("atomicassets"), eq(42))
            .times(1)
            .returning(|_, _| Ok(Some(5)));

        let stats = AssetStatsUseCase::new(Arc::new(assets), "atomicassets")
            .execute("42")
            .await
            .unwrap();
        assert_eq!(stats.template_mint, "5");
    }

    #[tokio::test]
    async fn test_stats_missing_asset() {
        let mut assets = MockAssetRepository::new();
        assets.expect_template_mint().returning(|_, _| Ok(None));

        let result = AssetStatsUseCase::new(Arc::new(assets), "atomicassets")
            .execute("42")
            .await;
        assert!(matches!(result, Err(UseCaseError::NotFound(_))));
    }
}
