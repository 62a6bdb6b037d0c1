use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::Json,
};

use crate::api::errors::ApiError;
use crate::application::dto::{ApiResponse, SaleRecord};
use crate::application::filler::Filled;
use crate::application::query::RequestParams;
use crate::application::use_cases::{
    EntityLogsUseCase, GetSaleUseCase, ListSalesUseCase, SaleTemplatesUseCase,
};
use crate::domain::entities::ActionLog;

/// GET /v1/sales
pub async fn list_sales_handler(
    State(use_case): State<Arc<ListSalesUseCase>>,
    Query(params): Query<RequestParams>,
) -> Result<Json<ApiResponse<Vec<Filled<SaleRecord>>>>, ApiError> {
    let sales = use_case.execute(&params).await?;
    Ok(Json(ApiResponse::ok(sales)))
}

/// GET /v1/sales/_count
pub async fn count_sales_handler(
    State(use_case): State<Arc<ListSalesUseCase>>,
    Query(params): Query<RequestParams>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    let count = use_case.count(&params).await?;
    Ok(Json(ApiResponse::ok(count.to_string())))
}

/// GET /v1/sales/templates
///
/// Cheapest listed sale per template.
pub async fn sale_templates_handler(
    State(use_case): State<Arc<SaleTemplatesUseCase>>,
    Query(params): Query<RequestParams>,
) -> Result<Json<ApiResponse<Vec<Filled<SaleRecord>>>>, ApiError> {
    let sales = use_case.execute(&params).await?;
    Ok(Json(ApiResponse::ok(sales)))
}

/// GET /v1/sales/{sale_id}
pub async fn get_sale_handler(
    State(use_case): State<Arc<GetSaleUseCase>>,
    Path(sale_id): Path<String>,
) -> Result<Json<ApiResponse<SaleRecord>>, ApiError> {
    let sale = use_case.execute(&sale_id).await?;
    Ok(Json(ApiResponse::ok(sale)))
}

/// GET /v1/sales/{sale_id}/logs
pub async fn sale_logs_handler(
    State(use_case): State<Arc<EntityLogsUseCase>>,
    Path(sale_id): Path<String>,
    Query(params): Query<RequestParams>,
) -> Result<Json<ApiResponse<Vec<ActionLog>>>, ApiError> {
    let logs = use_case.execute(&sale_id, &params).await?;
    Ok(Json(ApiResponse::ok(logs)))
}
