use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::application::dto::{AssetRecord, SaleRecord};
use crate::application::format::{format_asset, format_sale};
use crate::application::ports::{AssetRepository, RepositoryError, SaleRepository};

/// A resolved record, or the id of one that no longer resolves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Filled<T> {
    Found(T),
    Missing(String),
}

impl<T> Filled<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Filled::Found(record) => Some(record),
            Filled::Missing(_) => None,
        }
    }
}

/// Expands a page of primary keys into full public records, preserving the
/// order of the ids.
pub struct ResultFiller {
    asset_repo: Arc<dyn AssetRepository>,
    sale_repo: Arc<dyn SaleRepository>,
    assets_contract: String,
    market_contract: String,
}

impl ResultFiller {
    pub fn new(
        asset_repo: Arc<dyn AssetRepository>,
        sale_repo: Arc<dyn SaleRepository>,
        assets_contract: impl Into<String>,
        market_contract: impl Into<String>,
    ) -> Self {
        Self {
            asset_repo,
            sale_repo,
            assets_contract: assets_contract.into(),
            market_contract: market_contract.into(),
        }
    }

    pub fn assets_contract(&self) -> &str {
        &self.assets_contract
    }

    pub fn market_contract(&self) -> &str {
        &self.market_contract
    }

    pub async fn fill_assets(&self, ids: &[i64]) -> Result<Vec<Filled<AssetRecord>>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let lookup: HashMap<i64, AssetRecord> = self
            .asset_repo
            .fetch_by_ids(&self.assets_contract, ids)
            .await?
            .iter()
            .map(|asset| (asset.asset_id, format_asset(asset)))
            .collect();

        Ok(arrange(ids, &lookup))
    }

    pub async fn fill_sales(&self, ids: &[i64]) -> Result<Vec<Filled<SaleRecord>>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sales = self.sale_repo.fetch_by_ids(&self.market_contract, ids).await?;

        let mut asset_ids: Vec<i64> = sales.iter().flat_map(|s| s.asset_ids.iter().copied()).collect();
        asset_ids.sort_unstable();
        asset_ids.dedup();

        let assets: HashMap<i64, AssetRecord> = if asset_ids.is_empty() {
            HashMap::new()
        } else {
            self.asset_repo
                .fetch_by_ids(&self.assets_contract, &asset_ids)
                .await?
                .iter()
                .map(|asset| (asset.asset_id, format_asset(asset)))
                .collect()
        };

        let mut lookup = HashMap::with_capacity(sales.len());
        for sale in &sales {
            let record = format_sale(sale, arrange(&sale.asset_ids, &assets))?;
            lookup.insert(sale.sale_id, record);
        }

        Ok(arrange(ids, &lookup))
    }
}

fn arrange<T: Clone>(ids: &[i64], lookup: &HashMap<i64, T>) -> Vec<Filled<T>> {
    ids.iter()
        .map(|id| match lookup.get(id) {
            Some(record) => Filled::Found(record.clone()),
            None => Filled::Missing(id.to_string()),
        })
        .collect()
}
