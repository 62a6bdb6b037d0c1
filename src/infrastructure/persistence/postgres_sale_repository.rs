use async_trait::async_trait;
use sqlx::PgPool;

use crate::application::ports::{RepositoryError, SaleRepository};
use crate::domain::entities::Sale;

pub struct PostgresSaleRepository {
    pool: PgPool,
}

impl PostgresSaleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SaleRepository for PostgresSaleRepository {
    async fn fetch_by_ids(&self, market_contract: &str, ids: &[i64]) -> Result<Vec<Sale>, RepositoryError> {
        let rows = sqlx::query_as::<_, SaleRow>(
            r#"
            SELECT listing.market_contract, listing.assets_contract, listing.sale_id,
                   listing.seller, listing.buyer, listing.offer_id, offer.state AS offer_state,
                   listing.state, listing.listing_price, listing.listing_symbol,
                   listing.settlement_symbol, listing.final_price, price.price,
                   listing.maker_marketplace, listing.taker_marketplace, listing.collection_name,
                   ARRAY(
                       SELECT offer_asset.asset_id FROM atomicassets_offers_assets offer_asset
                       WHERE offer_asset.contract = listing.assets_contract
                           AND offer_asset.offer_id = listing.offer_id
                       ORDER BY offer_asset.index ASC
                   ) AS asset_ids,
                   listing.updated_at_block, listing.updated_at_time,
                   listing.created_at_block, listing.created_at_time
            FROM atomicmarket_sales listing
            LEFT JOIN atomicassets_offers offer
                ON (listing.assets_contract = offer.contract AND listing.offer_id = offer.offer_id)
            LEFT JOIN atomicmarket_sale_prices price
                ON (price.market_contract = listing.market_contract AND price.sale_id = listing.sale_id)
            WHERE listing.market_contract = $1 AND listing.sale_id = ANY($2)
            "#,
        )
        .bind(market_contract)
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(SaleRow::into_domain).collect())
    }
}

#[derive(sqlx::FromRow)]
struct SaleRow {
    market_contract: String,
    assets_contract: String,
    sale_id: i64,
    seller: String,
    buyer: Option<String>,
    offer_id: i64,
    offer_state: Option<i16>,
    state: i16,
    listing_price: i64,
    listing_symbol: String,
    settlement_symbol: String,
    final_price: Option<i64>,
    price: Option<i64>,
    maker_marketplace: String,
    taker_marketplace: Option<String>,
    collection_name: String,
    asset_ids: Vec<i64>,
    updated_at_block: i64,
    updated_at_time: i64,
    created_at_block: i64,
    created_at_time: i64,
}

impl SaleRow {
    fn into_domain(self) -> Sale {
        Sale {
            market_contract: self.market_contract,
            assets_contract: self.assets_contract,
            sale_id: self.sale_id,
            seller: self.seller,
            buyer: self.buyer,
            offer_id: self.offer_id,
            offer_state: self.offer_state,
            state: self.state,
            listing_price: self.listing_price,
            listing_symbol: self.listing_symbol,
            settlement_symbol: self.settlement_symbol,
            final_price: self.final_price,
            price: self.price,
            maker_marketplace: self.maker_marketplace,
            taker_marketplace: self.taker_marketplace,
            collection_name: self.collection_name,
            asset_ids: self.asset_ids,
            updated_at_block: self.updated_at_block,
            updated_at_time: self.updated_at_time,
            created_at_block: self.created_at_block,
            created_at_time: self.created_at_time,
        }
    }
}
