use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

use crate::application::ports::{AssetRepository, RepositoryError};
use crate::domain::entities::Asset;

const ASSET_SELECT: &str = r#"
    SELECT asset.contract, asset.asset_id, asset.owner, asset.collection_name, asset.schema_name,
           asset.template_id, asset.mutable_data, asset.immutable_data,
           "template".immutable_data AS template_immutable_data,
           "template".is_transferable, "template".is_burnable,
           mint.template_mint, mint.schema_mint, mint.collection_mint,
           asset.burned_by_account, asset.burned_at_block, asset.burned_at_time,
           asset.updated_at_block, asset.updated_at_time, asset.minted_at_block, asset.minted_at_time
    FROM atomicassets_assets asset
    LEFT JOIN atomicassets_templates "template"
        ON (asset.contract = "template".contract AND asset.template_id = "template".template_id)
    LEFT JOIN atomicassets_asset_mints mint
        ON (asset.contract = mint.contract AND asset.asset_id = mint.asset_id)
"#;

pub struct PostgresAssetRepository {
    pool: PgPool,
}

impl PostgresAssetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssetRepository for PostgresAssetRepository {
    async fn fetch_by_ids(&self, contract: &str, ids: &[i64]) -> Result<Vec<Asset>, RepositoryError> {
        let sql = format!("{} WHERE asset.contract = $1 AND asset.asset_id = ANY($2)", ASSET_SELECT);

        let rows = sqlx::query_as::<_, AssetRow>(&sql)
            .bind(contract)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(AssetRow::into_domain).collect())
    }

    async fn template_mint(&self, contract: &str, asset_id: i64) -> Result<Option<i64>, RepositoryError> {
        let row: Option<(Option<i64>,)> = sqlx::query_as(
            r#"
            SELECT mint.template_mint
            FROM atomicassets_assets asset
            LEFT JOIN atomicassets_asset_mints mint
                ON (asset.contract = mint.contract AND asset.asset_id = mint.asset_id)
            WHERE asset.contract = $1 AND asset.asset_id = $2
            "#,
        )
        .bind(contract)
        .bind(asset_id)
        .fetch_optional(&self.pool)
        .await?;

        // An existing asset without a template has mint 0.
        Ok(row.map(|(mint,)| mint.unwrap_or(0)))
    }
}

#[derive(sqlx::FromRow)]
struct AssetRow {
    contract: String,
    asset_id: i64,
    owner: Option<String>,
    collection_name: String,
    schema_name: String,
    template_id: Option<i64>,
    mutable_data: Value,
    immutable_data: Value,
    template_immutable_data: Option<Value>,
    is_transferable: Option<bool>,
    is_burnable: Option<bool>,
    template_mint: Option<i64>,
    schema_mint: Option<i64>,
    collection_mint: Option<i64>,
    burned_by_account: Option<String>,
    burned_at_block: Option<i64>,
    burned_at_time: Option<i64>,
    updated_at_block: i64,
    updated_at_time: i64,
    minted_at_block: i64,
    minted_at_time: i64,
}

impl AssetRow {
    fn into_domain(self) -> Asset {
        Asset {
            contract: self.contract,
            asset_id: self.asset_id,
            owner: self.owner,
            collection_name: self.collection_name,
            schema_name: self.schema_name,
            template_id: self.template_id,
            mutable_data: self.mutable_data,
            immutable_data: self.immutable_data,
            template_immutable_data: self.template_immutable_data,
            is_transferable: self.is_transferable,
            is_burnable: self.is_burnable,
            template_mint: self.template_mint,
            schema_mint: self.schema_mint,
            collection_mint: self.collection_mint,
            burned_by_account: self.burned_by_account,
            burned_at_block: self.burned_at_block,
            burned_at_time: self.burned_at_time,
            updated_at_block: self.updated_at_block,
            updated_at_time: self.updated_at_time,
            minted_at_block: self.minted_at_block,
            minted_at_time: self.minted_at_time,
        }
    }
}
