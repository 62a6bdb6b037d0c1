pub mod assets;
pub mod health;
pub mod sales;
pub mod sockets;

#[cfg(test)]
mod tests;

pub use assets::{
    asset_logs_handler, asset_stats_handler, count_assets_handler, get_asset_handler,
    list_assets_handler,
};
pub use health::{channels_handler, health_handler, readiness_handler, LiveStatus};
pub use sales::{
    count_sales_handler, get_sale_handler, list_sales_handler, sale_logs_handler,
    sale_templates_handler,
};
pub use sockets::socket_handler;
