use crate::domain::errors::DomainError;
use crate::domain::value_objects::SaleApiState;

/// Authoritative sale state as read from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Sale {
    pub market_contract: String,
    pub assets_contract: String,
    pub sale_id: i64,
    pub seller: String,
    pub buyer: Option<String>,
    pub offer_id: i64,
    pub offer_state: Option<i16>,
    pub state: i16,
    pub listing_price: i64,
    pub listing_symbol: String,
    pub settlement_symbol: String,
    pub final_price: Option<i64>,
    pub price: Option<i64>,
    pub maker_marketplace: String,
    pub taker_marketplace: Option<String>,
    pub collection_name: String,
    /// Offer asset ids in offer order
    pub asset_ids: Vec<i64>,
    pub updated_at_block: i64,
    pub updated_at_time: i64,
    pub created_at_block: i64,
    pub created_at_time: i64,
}

impl Sale {
    pub fn api_state(&self) -> Result<SaleApiState, DomainError> {
        SaleApiState::from_stored(self.state, self.offer_state)
    }
}
