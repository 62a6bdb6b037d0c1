//! Store rows to public records.
//!
//! The read API and the socket channels both format through these functions,
//! so a pushed record always has the same shape as a pulled one.

use serde_json::Value;

use crate::application::dto::{AssetRecord, PriceRecord, SaleRecord};
use crate::application::filler::Filled;
use crate::application::ports::RepositoryError;
use crate::domain::entities::{Asset, Sale};

pub fn format_asset(asset: &Asset) -> AssetRecord {
    let data = asset.merged_data();
    let name = data.get("name").and_then(Value::as_str).map(str::to_string);

    AssetRecord {
        contract: asset.contract.clone(),
        asset_id: asset.asset_id.to_string(),
        owner: asset.owner.clone(),
        is_transferable: asset.is_transferable.unwrap_or(true),
        is_burnable: asset.is_burnable.unwrap_or(true),
        collection_name: asset.collection_name.clone(),
        schema_name: asset.schema_name.clone(),
        template_id: asset.template_id.map(|id| id.to_string()),
        name,
        data,
        mutable_data: asset.mutable_data.clone(),
        immutable_data: asset.immutable_data.clone(),
        template_mint: asset.template_mint.map(|n| n.to_string()),
        schema_mint: asset.schema_mint.map(|n| n.to_string()),
        collection_mint: asset.collection_mint.map(|n| n.to_string()),
        burned_by_account: asset.burned_by_account.clone(),
        burned_at_block: asset.burned_at_block.map(|n| n.to_string()),
        burned_at_time: asset.burned_at_time.map(|n| n.to_string()),
        updated_at_block: asset.updated_at_block.to_string(),
        updated_at_time: asset.updated_at_time.to_string(),
        minted_at_block: asset.minted_at_block.to_string(),
        minted_at_time: asset.minted_at_time.to_string(),
    }
}

pub fn format_sale(sale: &Sale, assets: Vec<Filled<AssetRecord>>) -> Result<SaleRecord, RepositoryError> {
    let state = sale
        .api_state()
        .map_err(|e| RepositoryError::Decode(format!("sale {}: {}", sale.sale_id, e)))?;

    Ok(SaleRecord {
        market_contract: sale.market_contract.clone(),
        assets_contract: sale.assets_contract.clone(),
        sale_id: sale.sale_id.to_string(),
        seller: sale.seller.clone(),
        buyer: sale.buyer.clone(),
        offer_id: sale.offer_id.to_string(),
        listing_price: PriceRecord {
            token_symbol: sale.listing_symbol.clone(),
            amount: sale.listing_price.to_string(),
        },
        settlement_symbol: sale.settlement_symbol.clone(),
        price: sale.price.map(|p| p.to_string()),
        final_price: sale.final_price.map(|p| p.to_string()),
        maker_marketplace: sale.maker_marketplace.clone(),
        taker_marketplace: sale.taker_marketplace.clone(),
        collection_name: sale.collection_name.clone(),
        state,
        assets,
        updated_at_block: sale.updated_at_block.to_string(),
        updated_at_time: sale.updated_at_time.to_string(),
        created_at_block: sale.created_at_block.to_string(),
        created_at_time: sale.created_at_time.to_string(),
    })
}
