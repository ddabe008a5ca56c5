use super::common::success_response;
use crate::{
    handlers::AppState,
    queries::{catalog_queries::ClientView, ListClientsQuery, Query},
    ApiResult,
};
use axum::{extract::State, routing::get, Router};

/// List every client with the balance they currently owe
#[utoipa::path(
    get,
    path = "/api/v1/clients",
    summary = "List clients",
    responses(
        (status = 200, description = "Clients with balances", body = crate::ApiResponse<Vec<ClientView>>),
        (status = 500, description = "Storage failure", body = crate::errors::ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn list_clients(State(state): State<AppState>) -> ApiResult<Vec<ClientView>> {
    let clients = ListClientsQuery.execute(&state.db_access()).await?;
    Ok(success_response(clients))
}

pub fn client_routes() -> Router<AppState> {
    Router::new().route("/clients", get(list_clients))
}
