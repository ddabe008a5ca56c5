mod common;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use rust_decimal_macros::dec;
use serde_json::json;

use common::{json_decimal, response_json, TestApp};

#[tokio::test]
async fn submit_then_fetch_purchase_order() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/purchase-orders",
            Some(json!({"clientId": 1, "lines": [{"partNo": 1, "qty": 10}]})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Purchase order created successfully");
    let po_no = body["data"]["poNo"].as_i64().expect("poNo");

    let response = app
        .request(Method::GET, &format!("/api/v1/purchase-orders/{po_no}"), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    let po = &body["data"];
    assert_eq!(po["poNo"], po_no);
    assert_eq!(po["clientName"], "ABC Construction");
    assert_eq!(po["clientPhone"], "555-123-4567");
    assert_eq!(po["status"], "New");
    assert_eq!(po["lines"][0]["lineNo"], 1);
    assert_eq!(po["lines"][0]["description"], "Concrete Mix");
    assert_eq!(json_decimal(&po["lines"][0]["price"]), dec!(15.99));
    assert_eq!(json_decimal(&po["total"]), dec!(159.90));
}

#[tokio::test]
async fn catalog_endpoints_reflect_committed_order() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/purchase-orders",
            Some(json!({"clientId": 2, "lines": [{"partNo": 3, "qty": 4}]})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let parts = response_json(app.request(Method::GET, "/api/v1/parts", None).await).await;
    let parts = parts["data"].as_array().expect("parts array");
    assert_eq!(parts.len(), 5);
    let lumber = parts
        .iter()
        .find(|p| p["partNo"] == 3)
        .expect("part 3 listed");
    assert_eq!(lumber["quantityOnHand"], 196);

    let clients = response_json(app.request(Method::GET, "/api/v1/clients", None).await).await;
    let xyz = clients["data"]
        .as_array()
        .expect("clients array")
        .iter()
        .find(|c| c["clientId"] == 2)
        .cloned()
        .expect("client 2 listed");
    assert_eq!(json_decimal(&xyz["balance"]), dec!(23.00));

    let orders =
        response_json(app.request(Method::GET, "/api/v1/purchase-orders", None).await).await;
    let orders = orders["data"].as_array().expect("orders array");
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["clientName"], "XYZ Builders");
}

#[tokio::test]
async fn insufficient_stock_maps_to_422_with_details() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/purchase-orders",
            Some(json!({"clientId": 1, "lines": [{"partNo": 2, "qty": 30}]})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = response_json(response).await;
    assert_eq!(body["code"], "insufficient_stock");
    assert_eq!(body["details"]["partNo"], 2);
    assert_eq!(body["details"]["available"], 25);
    assert_eq!(body["details"]["requested"], 30);
    assert_eq!(app.quantity_on_hand(2).await, 25);
}

#[tokio::test]
async fn unknown_client_and_part_map_to_404() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/purchase-orders",
            Some(json!({"clientId": 999, "lines": [{"partNo": 1, "qty": 1}]})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = response_json(response).await;
    assert_eq!(body["code"], "client_not_found");
    assert_eq!(body["details"]["clientId"], 999);

    let response = app
        .request(
            Method::POST,
            "/api/v1/purchase-orders",
            Some(json!({"clientId": 1, "lines": [{"partNo": 1, "qty": 5}, {"partNo": 777, "qty": 1}]})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = response_json(response).await;
    assert_eq!(body["code"], "part_not_found");
    assert_eq!(app.quantity_on_hand(1).await, 100);
}

#[tokio::test]
async fn invalid_line_maps_to_400() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/purchase-orders",
            Some(json!({"clientId": 1, "lines": [{"partNo": 1, "qty": 0}]})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["code"], "invalid_line");
    assert_eq!(body["details"]["line"], 1);
}

#[tokio::test]
async fn empty_lines_map_to_400() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/purchase-orders",
            Some(json!({"clientId": 1, "lines": []})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response_json(response).await["code"], "invalid_request");
}

#[tokio::test]
async fn malformed_json_uses_error_envelope() {
    let app = TestApp::new().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/purchase-orders")
        .header("content-type", "application/json")
        .body(Body::from("{\"clientId\": 1, \"lines\": ["))
        .unwrap();
    let response = app.send(request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(app.order_count().await, 0);
}

#[tokio::test]
async fn fractional_quantity_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/purchase-orders",
            Some(json!({"clientId": 1, "lines": [{"partNo": 1, "qty": 1.5}]})),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.order_count().await, 0);
}

#[tokio::test]
async fn missing_purchase_order_is_404() {
    let app = TestApp::new().await;

    let response = app
        .request(Method::GET, "/api/v1/purchase-orders/9999", None)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = response_json(response).await;
    assert_eq!(body["code"], "order_not_found");
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn non_numeric_po_number_uses_error_envelope() {
    let app = TestApp::new().await;

    let response = app
        .request_with_headers(
            Method::GET,
            "/api/v1/purchase-orders/abc",
            None,
            &[("x-request-id", "trace-po-abc")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response_json(response).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["request_id"], "trace-po-abc");
}

#[tokio::test]
async fn request_id_is_echoed_on_success_and_error() {
    let app = TestApp::new().await;

    let response = app
        .request_with_headers(
            Method::GET,
            "/api/v1/purchase-orders/9999",
            None,
            &[("x-request-id", "trace-po-1")],
        )
        .await;
    assert_eq!(
        response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok()),
        Some("trace-po-1")
    );
    let body = response_json(response).await;
    assert_eq!(body["request_id"], "trace-po-1");

    let response = app
        .request_with_headers(
            Method::GET,
            "/api/v1/parts",
            None,
            &[("x-request-id", "trace-parts-1")],
        )
        .await;
    let body = response_json(response).await;
    assert_eq!(body["meta"]["request_id"], "trace-parts-1");
}

#[tokio::test]
async fn status_and_health_respond() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/api/v1/status", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await["data"]["status"], "ok");

    let response = app.request(Method::GET, "/health/ready", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await["ready"], true);
}
