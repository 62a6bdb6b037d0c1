//! Live change-event fan-out to WebSocket subscribers.

pub mod admission;
pub mod asset_events;
pub mod channel;
pub mod messages;
pub mod namespace;
pub mod sale_events;

pub use admission::{ConnectionAdmission, ConnectionSlot};
pub use asset_events::AssetEventHandler;
pub use channel::{
    ChannelHandle, ChannelHandler, ChannelStatsSnapshot, HandlerOutcome, NotificationChannel,
};
pub use messages::ServerMessage;
pub use namespace::{SocketNamespace, Subscription};
pub use sale_events::SaleEventHandler;
