mod channel_topic;
mod pagination;
mod sale_state;
mod sort_order;

pub use channel_topic::ChannelTopic;
pub use pagination::Pagination;
pub use sale_state::{SaleApiState, SaleState, OFFER_STATE_PENDING};
pub use sort_order::SortOrder;
