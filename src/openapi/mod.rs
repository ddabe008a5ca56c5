use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Inventory & Purchase Order API",
        version = "1.0.0",
        description = r#"
# Inventory & Purchase Order API

Keeps a parts catalog with stock on hand, a client ledger with outstanding
balances, and the purchase orders clients place against the catalog.

## Submitting orders

`POST /api/v1/purchase-orders` is all-or-nothing. Every line is checked
(part exists, quantity is a positive integer, enough stock for the total
requested of that part) before anything is written. A committed order
decrements stock and raises the client balance by the sum of
`qty * price` over its lines.

## Error Handling

Failures use one envelope with a stable machine-readable `code`:

```json
{
  "error": "Unprocessable Entity",
  "code": "insufficient_stock",
  "message": "Insufficient stock for part 2: 25 available, 30 requested",
  "details": { "partNo": 2, "available": 25, "requested": 30 },
  "request_id": "5f0c...",
  "timestamp": "2025-03-01T00:00:00Z"
}
```
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "catalog", description = "Parts and clients"),
        (name = "purchase-orders", description = "Purchase order submission and lookup")
    ),
    paths(
        crate::handlers::parts::list_parts,
        crate::handlers::clients::list_clients,
        crate::handlers::purchase_orders::create_purchase_order,
        crate::handlers::purchase_orders::list_purchase_orders,
        crate::handlers::purchase_orders::get_purchase_order,
    ),
    components(
        schemas(
            crate::queries::PartView,
            crate::queries::ClientView,
            crate::queries::PurchaseOrderSummary,
            crate::queries::PurchaseOrderLineView,
            crate::queries::PurchaseOrderDetail,
            crate::services::SubmitOrderRequest,
            crate::services::OrderLineRequest,
            crate::services::SubmittedOrder,
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}
