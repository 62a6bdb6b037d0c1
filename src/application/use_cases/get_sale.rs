use std::sync::Arc;

use crate::application::dto::SaleRecord;
use crate::application::errors::UseCaseError;
use crate::application::filler::{Filled, ResultFiller};
use crate::application::validation::parse_id;

/// Use case: single sale by id
pub struct GetSaleUseCase {
    filler: Arc<ResultFiller>,
}

impl GetSaleUseCase {
    pub fn new(filler: Arc<ResultFiller>) -> Self {
        Self { filler }
    }

    pub async fn execute(&self, sale_id: &str) -> Result<SaleRecord, UseCaseError> {
        let sale_id = parse_id("sale_id", sale_id)?;

        self.filler
            .fill_sales(&[sale_id])
            .await?
            .into_iter()
            .next()
            .and_then(Filled::found)
            .ok_or_else(|| UseCaseError::NotFound("Sale not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockAssetRepository, MockSaleRepository};
    use crate::test_support::{sample_asset, sample_sale};

    #[tokio::test]
    async fn test_get_sale() {
        let mut sales = MockSaleRepository::new();
        sales
            .expect_fetch_by_ids()
            .returning(|_, _| Ok(vec![sample_sale(9, vec![1])]));
        let mut assets = MockAssetRepository::new();
        assets
            .expect_fetch_by_ids()
            .returning(|_, _| Ok(vec![sample_asset(1)]));

        let filler = ResultFiller::new(Arc::new(assets), Arc::new(sales), "atomicassets", "atomicmarket");
        let sale = GetSaleUseCase::new(Arc::new(filler)).execute("9").await.unwrap();

        assert_eq!(sale.sale_id, "9");
        assert_eq!(sale.assets.len(), 1);
    }

    #[tokio::test]
    async fn test_get_sale_missing() {
        let mut sales = MockSaleRepository::new();
        sales.expect_fetch_by_ids().returning(|_, _| Ok(vec![]));

        let filler = ResultFiller::new(
            Arc::new(MockAssetRepository::new()),
            Arc::new(sales),
            "atomicassets",
            "atomicmarket",
        );
        let result = GetSaleUseCase::new(Arc::new(filler)).execute("9").await;

        assert!(matches!(result, Err(UseCaseError::NotFound(_))));
    }
}
