mod entity_logs;
mod get_asset;
mod get_sale;
mod list_assets;
mod list_sales;
mod sale_templates;

pub use entity_logs::{EntityLogsUseCase, SALE_ACTIONS};
pub use get_asset::{AssetStatsUseCase, GetAssetUseCase};
pub use get_sale::GetSaleUseCase;
pub use list_assets::ListAssetsUseCase;
pub use list_sales::{ListSalesUseCase, SALE_MAX_LIMIT};
pub use sale_templates::SaleTemplatesUseCase;
