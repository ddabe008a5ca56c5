use super::common::success_response;
use crate::{
    handlers::AppState,
    queries::{catalog_queries::PartView, ListPartsQuery, Query},
    ApiResult,
};
use axum::{extract::State, routing::get, Router};

/// List every part with its price and stock on hand
#[utoipa::path(
    get,
    path = "/api/v1/parts",
    summary = "List parts",
    description = "Returns the parts catalog ordered by part number.",
    responses(
        (status = 200, description = "Parts catalog", body = crate::ApiResponse<Vec<PartView>>),
        (status = 500, description = "Storage failure", body = crate::errors::ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn list_parts(State(state): State<AppState>) -> ApiResult<Vec<PartView>> {
    let parts = ListPartsQuery.execute(&state.db_access()).await?;
    Ok(success_response(parts))
}

pub fn part_routes() -> Router<AppState> {
    Router::new().route("/parts", get(list_parts))
}
