#![allow(dead_code)]

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Method, Request},
    response::Response,
    Router,
};
use inventory_po_api::{
    build_router,
    config::AppConfig,
    db::{self, DbConfig},
    entities::{client, part, purchase_order},
    AppState,
};
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

/// Helper harness for spinning up an application backed by a private
/// in-memory SQLite database holding the demo catalog.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    // Keeps a file-backed database alive for the lifetime of the app
    _dir: Option<TempDir>,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Same as [`TestApp::new`] but lets the caller adjust configuration first.
    pub async fn with_config(adjust: impl FnOnce(&mut AppConfig)) -> Self {
        Self::build(DbConfig::in_memory(), None, adjust).await
    }

    /// Application over a SQLite file in a temporary directory, with a pool of
    /// `max_connections` so submissions really run side by side.
    pub async fn file_backed(max_connections: u32) -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("inventory.db");
        let db_config = DbConfig {
            url: format!("sqlite://{}?mode=rwc", path.display()),
            max_connections,
            min_connections: 1,
            ..Default::default()
        };
        Self::build(db_config, Some(dir), |_| {}).await
    }

    async fn build(
        db_config: DbConfig,
        dir: Option<TempDir>,
        adjust: impl FnOnce(&mut AppConfig),
    ) -> Self {
        let mut cfg = AppConfig::new(
            db_config.url.clone(),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        cfg.cors_allow_any_origin = true;
        adjust(&mut cfg);

        let pool = db::establish_connection_with_config(&db_config)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool).await.expect("migrations");
        db::seed_demo_data(&pool).await.expect("seed data");

        let state = AppState::new(Arc::new(pool), cfg);
        let router = build_router(state.clone());

        Self {
            router,
            state,
            _dir: dir,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        self.state.db.as_ref()
    }

    /// Send a request against the router.
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        self.request_with_headers(method, uri, body, &[]).await
    }

    pub async fn request_with_headers(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.send(request).await
    }

    /// Send a pre-built request, for payloads that are not valid JSON.
    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    pub async fn quantity_on_hand(&self, part_id: i32) -> i32 {
        part::Entity::find_by_id(part_id)
            .one(self.db())
            .await
            .expect("part lookup")
            .expect("part exists")
            .quantity_on_hand
    }

    pub async fn balance(&self, client_id: i32) -> Decimal {
        client::Entity::find_by_id(client_id)
            .one(self.db())
            .await
            .expect("client lookup")
            .expect("client exists")
            .balance
            .round_dp(2)
    }

    pub async fn order_count(&self) -> u64 {
        purchase_order::Entity::find()
            .count(self.db())
            .await
            .expect("order count")
    }
}

pub async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}

/// Reads a decimal rendered as a JSON string
pub fn json_decimal(value: &Value) -> Decimal {
    let raw = value.as_str().expect("decimal rendered as string");
    Decimal::from_str(raw).expect("valid decimal")
}
