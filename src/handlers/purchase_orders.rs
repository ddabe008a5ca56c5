use super::common::{created_response, json_body, path_param, success_response};
use crate::{
    handlers::AppState,
    queries::{
        GetPurchaseOrderDetailQuery, ListPurchaseOrdersQuery, PurchaseOrderDetail,
        PurchaseOrderSummary, Query,
    },
    services::order_submission::{SubmitOrderRequest, SubmittedOrder},
    ApiResult,
};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    response::Response,
    routing::get,
    Json, Router,
};
use tracing::info;

/// Submit a purchase order
#[utoipa::path(
    post,
    path = "/api/v1/purchase-orders",
    summary = "Submit a purchase order",
    description = "Validates every line before writing anything. On success the order header, \
                   its lines, the stock decrements and the client balance change are committed \
                   together; on any failure nothing is written.",
    request_body = SubmitOrderRequest,
    responses(
        (status = 201, description = "Purchase order created", body = crate::ApiResponse<SubmittedOrder>),
        (status = 400, description = "Malformed request or invalid line", body = crate::errors::ErrorResponse),
        (status = 404, description = "Unknown client or part", body = crate::errors::ErrorResponse),
        (status = 422, description = "Not enough stock for a line", body = crate::errors::ErrorResponse),
        (status = 500, description = "Storage failure", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn create_purchase_order(
    State(state): State<AppState>,
    payload: Result<Json<SubmitOrderRequest>, JsonRejection>,
) -> Result<Response, crate::errors::ServiceError> {
    let request = json_body(payload)?;
    let submitted = state.order_service.submit_order(request).await?;

    info!(po_no = submitted.po_no, "Purchase order submitted via API");
    Ok(created_response(
        submitted,
        "Purchase order created successfully",
    ))
}

/// List purchase orders
#[utoipa::path(
    get,
    path = "/api/v1/purchase-orders",
    summary = "List purchase orders",
    responses(
        (status = 200, description = "Purchase orders with client names", body = crate::ApiResponse<Vec<PurchaseOrderSummary>>),
        (status = 500, description = "Storage failure", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn list_purchase_orders(
    State(state): State<AppState>,
) -> ApiResult<Vec<PurchaseOrderSummary>> {
    let orders = ListPurchaseOrdersQuery.execute(&state.db_access()).await?;
    Ok(success_response(orders))
}

/// Get one purchase order with its lines and total
#[utoipa::path(
    get,
    path = "/api/v1/purchase-orders/{po_no}",
    summary = "Get purchase order",
    params(
        ("po_no" = i32, Path, description = "Purchase order number")
    ),
    responses(
        (status = 200, description = "Purchase order detail", body = crate::ApiResponse<PurchaseOrderDetail>),
        (status = 400, description = "Purchase order number is not an integer", body = crate::errors::ErrorResponse),
        (status = 404, description = "Purchase order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn get_purchase_order(
    State(state): State<AppState>,
    po_no: Result<Path<i32>, PathRejection>,
) -> ApiResult<PurchaseOrderDetail> {
    let po_no = path_param(po_no)?;
    let detail = GetPurchaseOrderDetailQuery { po_no }
        .execute(&state.db_access())
        .await?;
    Ok(success_response(detail))
}

pub fn purchase_order_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/purchase-orders",
            get(list_purchase_orders).post(create_purchase_order),
        )
        .route("/purchase-orders/:po_no", get(get_purchase_order))
}
