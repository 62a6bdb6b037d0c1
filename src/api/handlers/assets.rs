use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::Json,
};

use crate::api::errors::ApiError;
use crate::application::dto::{ApiResponse, AssetRecord, AssetStats};
use crate::application::filler::Filled;
use crate::application::query::RequestParams;
use crate::application::use_cases::{
    AssetStatsUseCase, EntityLogsUseCase, GetAssetUseCase, ListAssetsUseCase,
};
use crate::domain::entities::ActionLog;

/// GET /v1/assets
pub async fn list_assets_handler(
    State(use_case): State<Arc<ListAssetsUseCase>>,
    Query(params): Query<RequestParams>,
) -> Result<Json<ApiResponse<Vec<Filled<AssetRecord>>>>, ApiError> {
    let assets = use_case.execute(&params).await?;
    Ok(Json(ApiResponse::ok(assets)))
}

/// GET /v1/assets/_count
pub async fn count_assets_handler(
    State(use_case): State<Arc<ListAssetsUseCase>>,
    Query(params): Query<RequestParams>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    let count = use_case.count(&params).await?;
    Ok(Json(ApiResponse::ok(count.to_string())))
}

/// GET /v1/assets/{asset_id}
pub async fn get_asset_handler(
    State(use_case): State<Arc<GetAssetUseCase>>,
    Path(asset_id): Path<String>,
) -> Result<Json<ApiResponse<AssetRecord>>, ApiError> {
    let asset = use_case.execute(&asset_id).await?;
    Ok(Json(ApiResponse::ok(asset)))
}

/// GET /v1/assets/{asset_id}/stats
pub async fn asset_stats_handler(
    State(use_case): State<Arc<AssetStatsUseCase>>,
    Path(asset_id): Path<String>,
) -> Result<Json<ApiResponse<AssetStats>>, ApiError> {
    let stats = use_case.execute(&asset_id).await?;
    Ok(Json(ApiResponse::ok(stats)))
}

/// GET /v1/assets/{asset_id}/logs
pub async fn asset_logs_handler(
    State(use_case): State<Arc<EntityLogsUseCase>>,
    Path(asset_id): Path<String>,
    Query(params): Query<RequestParams>,
) -> Result<Json<ApiResponse<Vec<ActionLog>>>, ApiError> {
    let logs = use_case.execute(&asset_id, &params).await?;
    Ok(Json(ApiResponse::ok(logs)))
}
