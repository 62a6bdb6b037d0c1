use axum::{middleware as axum_middleware, routing::get, Router};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;

use crate::api::handlers::{
    asset_logs_handler, asset_stats_handler, channels_handler, count_assets_handler,
    count_sales_handler, get_asset_handler, get_sale_handler, health_handler, list_assets_handler,
    list_sales_handler, readiness_handler, sale_logs_handler, sale_templates_handler,
    socket_handler, LiveStatus,
};
use crate::api::middleware::{cors, metrics};
use crate::application::notifications::SocketNamespace;
use crate::application::use_cases::{
    AssetStatsUseCase, EntityLogsUseCase, GetAssetUseCase, GetSaleUseCase, ListAssetsUseCase,
    ListSalesUseCase, SaleTemplatesUseCase,
};

/// Application state container
pub struct AppState {
    pub pool: Arc<PgPool>,
    pub list_assets: Arc<ListAssetsUseCase>,
    pub get_asset: Arc<GetAssetUseCase>,
    pub asset_stats: Arc<AssetStatsUseCase>,
    pub asset_logs: Arc<EntityLogsUseCase>,
    pub list_sales: Arc<ListSalesUseCase>,
    pub sale_templates: Arc<SaleTemplatesUseCase>,
    pub get_sale: Arc<GetSaleUseCase>,
    pub sale_logs: Arc<EntityLogsUseCase>,
    pub asset_sockets: Arc<SocketNamespace>,
    pub sale_sockets: Arc<SocketNamespace>,
    pub live: Arc<LiveStatus>,
    pub allowed_origins: String,
}

/// Create router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/health/ready",
            get(readiness_handler).with_state(Arc::clone(&state.pool)),
        )
        .route(
            "/health/channels",
            get(channels_handler).with_state(Arc::clone(&state.live)),
        )
        // atomicassets
        .route(
            "/v1/assets",
            get(list_assets_handler).with_state(Arc::clone(&state.list_assets)),
        )
        .route(
            "/v1/assets/_count",
            get(count_assets_handler).with_state(Arc::clone(&state.list_assets)),
        )
        .route(
            "/v1/assets/socket",
            get(socket_handler).with_state(Arc::clone(&state.asset_sockets)),
        )
        .route(
            "/v1/assets/{asset_id}",
            get(get_asset_handler).with_state(state.get_asset),
        )
        .route(
            "/v1/assets/{asset_id}/stats",
            get(asset_stats_handler).with_state(state.asset_stats),
        )
        .route(
            "/v1/assets/{asset_id}/logs",
            get(asset_logs_handler).with_state(state.asset_logs),
        )
        // atomicmarket
        .route(
            "/v1/sales",
            get(list_sales_handler).with_state(Arc::clone(&state.list_sales)),
        )
        .route(
            "/v1/sales/_count",
            get(count_sales_handler).with_state(Arc::clone(&state.list_sales)),
        )
        .route(
            "/v1/sales/templates",
            get(sale_templates_handler).with_state(state.sale_templates),
        )
        .route(
            "/v1/sales/socket",
            get(socket_handler).with_state(Arc::clone(&state.sale_sockets)),
        )
        .route(
            "/v1/sales/{sale_id}",
            get(get_sale_handler).with_state(state.get_sale),
        )
        .route(
            "/v1/sales/{sale_id}/logs",
            get(sale_logs_handler).with_state(state.sale_logs),
        )
        .layer(CompressionLayer::new())
        .layer(cors::create_cors_layer(&state.allowed_origins))
        .layer(axum_middleware::from_fn(metrics::metrics_middleware))
}
