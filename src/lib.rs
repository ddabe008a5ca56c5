//! Inventory & Purchase Order API Library
//!
//! Parts catalog, client ledger and the all-or-nothing purchase-order
//! submission that ties them together.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod health;
pub mod middleware_helpers;
pub mod openapi;
pub mod queries;
pub mod repositories;
pub mod services;
pub mod tracing;

use axum::{response::Json, routing::get, Router};
use chrono::Utc;
use http::HeaderValue;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer};
use utoipa::ToSchema;

use crate::db::DatabaseAccess;
use crate::services::OrderSubmissionService;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub order_service: OrderSubmissionService,
}

impl AppState {
    /// Wires the services for `config` onto a shared pool
    pub fn new(db: Arc<DatabaseConnection>, config: config::AppConfig) -> Self {
        let order_service = OrderSubmissionService::from_config(db.clone(), &config);
        Self {
            db,
            config,
            order_service,
        }
    }

    pub fn db_access(&self) -> DatabaseAccess {
        DatabaseAccess::new(self.db.clone())
    }
}

// Common response wrappers
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

#[derive(Serialize, ToSchema)]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: String,
}

impl ResponseMeta {
    fn capture() -> Self {
        Self {
            request_id: crate::tracing::current_request_id().map(|rid| rid.as_str().to_string()),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            meta: Some(ResponseMeta::capture()),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}


/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, errors::ServiceError>;

/// Routes mounted under `/api/v1`
pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .route("/status", get(api_status))
        .merge(handlers::parts::part_routes())
        .merge(handlers::clients::client_routes())
        .merge(handlers::purchase_orders::purchase_order_routes())
}

async fn api_status() -> ApiResult<Value> {
    let status_data = json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "git": option_env!("GIT_HASH").unwrap_or("unknown"),
        "build_time": option_env!("BUILD_TIME").unwrap_or("unknown"),
        "service": "inventory-po-api",
        "timestamp": Utc::now().to_rfc3339(),
    });

    Ok(Json(ApiResponse::success(status_data)))
}

/// Builds the CORS layer from configuration.
///
/// Explicit origins win; otherwise development or an explicit opt-in get a
/// permissive layer and everything else gets a same-origin-only layer.
pub fn cors_layer(cfg: &config::AppConfig) -> CorsLayer {
    let configured_origins: Option<Vec<HeaderValue>> = cfg
        .cors_allowed_origins
        .as_ref()
        .map(|raw| {
            raw.split(',')
                .filter_map(|origin| {
                    let trimmed = origin.trim();
                    if trimmed.is_empty() {
                        None
                    } else {
                        HeaderValue::from_str(trimmed).ok()
                    }
                })
                .collect::<Vec<_>>()
        })
        .filter(|origins| !origins.is_empty());

    if let Some(origins) = configured_origins {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any)
    } else if cfg.should_allow_permissive_cors() {
        ::tracing::info!("Using permissive CORS because explicit origins were not configured");
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
    }
}

/// Full HTTP application: health, versioned API and Swagger UI, with request
/// ids, HTTP tracing, CORS and the request timeout applied.
pub fn build_router(state: AppState) -> Router {
    let timeout = state.config.request_timeout();
    let cors = cors_layer(&state.config);
    let health = health::health_routes(state.db.clone());

    Router::<AppState>::new()
        .route("/", get(|| async { "inventory-po-api up" }))
        .nest("/api/v1", api_v1_routes())
        .merge(openapi::swagger_ui())
        .with_state(state)
        .merge(health)
        .layer(crate::tracing::configure_http_tracing())
        .layer(TimeoutLayer::new(timeout))
        .layer(cors)
        // Ensure every request carries a request id for traceability
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id::request_id_middleware,
        ))
}

pub mod prelude {
    pub use crate::config::{load_config, AppConfig};
    pub use crate::db::{DatabaseAccess, DbConfig, DbPool};
    pub use crate::errors::{ErrorResponse, ServiceError};
    pub use crate::queries::*;
    pub use crate::services::*;
    pub use crate::{build_router, ApiResponse, AppState};
}
