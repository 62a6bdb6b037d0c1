use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::filler::Filled;
use crate::domain::value_objects::SaleApiState;

/// Success envelope shared by every JSON endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    /// Unix milliseconds at which the response was built
    pub query_time: i64,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            query_time: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// Public asset record, identical for REST responses and socket messages.
///
/// 64-bit ids, block numbers and timestamps are rendered as decimal strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub contract: String,
    pub asset_id: String,
    pub owner: Option<String>,
    pub is_transferable: bool,
    pub is_burnable: bool,
    pub collection_name: String,
    pub schema_name: String,
    pub template_id: Option<String>,
    pub name: Option<String>,
    pub data: Value,
    pub mutable_data: Value,
    pub immutable_data: Value,
    pub template_mint: Option<String>,
    pub schema_mint: Option<String>,
    pub collection_mint: Option<String>,
    pub burned_by_account: Option<String>,
    pub burned_at_block: Option<String>,
    pub burned_at_time: Option<String>,
    pub updated_at_block: String,
    pub updated_at_time: String,
    pub minted_at_block: String,
    pub minted_at_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub token_symbol: String,
    pub amount: String,
}

/// Public sale record with its offer assets resolved in offer order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub market_contract: String,
    pub assets_contract: String,
    pub sale_id: String,
    pub seller: String,
    pub buyer: Option<String>,
    pub offer_id: String,
    pub listing_price: PriceRecord,
    pub settlement_symbol: String,
    /// Current price in the settlement token, when a conversion exists
    pub price: Option<String>,
    pub final_price: Option<String>,
    pub maker_marketplace: String,
    pub taker_marketplace: Option<String>,
    pub collection_name: String,
    pub state: SaleApiState,
    pub assets: Vec<Filled<AssetRecord>>,
    pub updated_at_block: String,
    pub updated_at_time: String,
    pub created_at_block: String,
    pub created_at_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetStats {
    pub template_mint: String,
}
