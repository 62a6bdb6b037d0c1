//! Shared fixtures for unit tests.

use serde_json::json;

use crate::domain::entities::{Asset, Sale};

pub fn sample_asset(asset_id: i64) -> Asset {
    Asset {
        contract: "atomicassets".to_string(),
        asset_id,
        owner: Some("alice".to_string()),
        collection_name: "heroes".to_string(),
        schema_name: "cards".to_string(),
        template_id: Some(7),
        mutable_data: json!({"level": 3}),
        immutable_data: json!({"name": "override"}),
        template_immutable_data: Some(json!({"name": "Knight", "rarity": "rare"})),
        is_transferable: Some(true),
        is_burnable: Some(true),
        template_mint: Some(1),
        schema_mint: Some(2),
        collection_mint: Some(3),
        burned_by_account: None,
        burned_at_block: None,
        burned_at_time: None,
        updated_at_block: 100,
        updated_at_time: 1_600_000_100_000,
        minted_at_block: 90,
        minted_at_time: 1_600_000_000_000,
    }
}

pub fn sample_sale(sale_id: i64, asset_ids: Vec<i64>) -> Sale {
    Sale {
        market_contract: "atomicmarket".to_string(),
        assets_contract: "atomicassets".to_string(),
        sale_id,
        seller: "alice".to_string(),
        buyer: None,
        offer_id: sale_id + 100,
        offer_state: Some(0),
        state: 1,
        listing_price: 1000,
        listing_symbol: "WAX".to_string(),
        settlement_symbol: "WAX".to_string(),
        final_price: None,
        price: Some(1000),
        maker_marketplace: "market".to_string(),
        taker_marketplace: None,
        collection_name: "heroes".to_string(),
        asset_ids,
        updated_at_block: 200,
        updated_at_time: 1_600_000_200_000,
        created_at_block: 150,
        created_at_time: 1_600_000_150_000,
    }
}
