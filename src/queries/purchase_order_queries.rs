use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;

use super::Query;
use crate::{
    db::DatabaseAccess,
    entities::{client, line_item, part, purchase_order},
    errors::ServiceError,
    repositories::OrderRepository,
    tracing::with_metrics,
};

/// One row of the purchase-order list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderSummary {
    #[schema(example = 1)]
    pub po_no: i32,
    #[schema(example = 1)]
    pub client_id: i32,
    #[schema(example = "ABC Construction")]
    pub client_name: String,
    pub order_date: DateTime<Utc>,
    #[schema(example = "New")]
    pub status: String,
}

impl PurchaseOrderSummary {
    fn from_models(order: purchase_order::Model, client: Option<client::Model>) -> Self {
        Self {
            po_no: order.id,
            client_id: order.client_id,
            client_name: client.map(|c| c.name).unwrap_or_default(),
            order_date: order.order_date,
            status: order.status,
        }
    }
}

/// A line of a purchase order with its part description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderLineView {
    #[schema(example = 1)]
    pub line_no: i32,
    #[schema(example = 1)]
    pub part_no: i32,
    #[schema(example = "Concrete Mix")]
    pub description: String,
    #[schema(example = 10)]
    pub qty: i32,
    /// Unit price captured when the order was placed
    #[schema(value_type = String, example = "15.99")]
    pub price: Decimal,
    #[schema(value_type = String, example = "159.90")]
    pub extended_price: Decimal,
}

impl PurchaseOrderLineView {
    fn from_models(line: line_item::Model, part: Option<part::Model>) -> Self {
        Self {
            line_no: line.line_no,
            part_no: line.part_id,
            description: part.map(|p| p.description).unwrap_or_default(),
            qty: line.quantity,
            price: line.price.round_dp(2),
            extended_price: line.extended_price().round_dp(2),
        }
    }
}

/// Header, client contact, lines and read-time total of one purchase order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderDetail {
    #[schema(example = 1)]
    pub po_no: i32,
    pub order_date: DateTime<Utc>,
    #[schema(example = "New")]
    pub status: String,
    #[schema(example = 1)]
    pub client_id: i32,
    #[schema(example = "ABC Construction")]
    pub client_name: String,
    #[schema(example = "555-123-4567")]
    pub client_phone: String,
    pub lines: Vec<PurchaseOrderLineView>,
    /// Sum of quantity times price over all lines
    #[schema(value_type = String, example = "159.90")]
    pub total: Decimal,
}

/// Query listing purchase orders with their client name
#[derive(Debug, Default)]
pub struct ListPurchaseOrdersQuery;

#[async_trait]
impl Query for ListPurchaseOrdersQuery {
    type Result = Vec<PurchaseOrderSummary>;

    async fn execute(&self, db: &DatabaseAccess) -> Result<Self::Result, ServiceError> {
        let repo = OrderRepository::new(db.shared_pool());
        let rows = with_metrics("list_purchase_orders", || repo.list_with_clients()).await?;
        Ok(rows
            .into_iter()
            .map(|(order, client)| PurchaseOrderSummary::from_models(order, client))
            .collect())
    }
}

/// Query fetching one purchase order in full
#[derive(Debug)]
pub struct GetPurchaseOrderDetailQuery {
    pub po_no: i32,
}

#[async_trait]
impl Query for GetPurchaseOrderDetailQuery {
    type Result = PurchaseOrderDetail;

    #[instrument(skip(self, db), fields(po_no = self.po_no))]
    async fn execute(&self, db: &DatabaseAccess) -> Result<Self::Result, ServiceError> {
        let repo = OrderRepository::new(db.shared_pool());

        let (order, client) = repo
            .find_with_client(self.po_no)
            .await?
            .ok_or(ServiceError::OrderNotFound(self.po_no))?;

        let lines: Vec<PurchaseOrderLineView> = repo
            .lines_with_parts(self.po_no)
            .await?
            .into_iter()
            .map(|(line, part)| PurchaseOrderLineView::from_models(line, part))
            .collect();

        let total = lines
            .iter()
            .map(|line| line.extended_price)
            .sum::<Decimal>()
            .round_dp(2);

        let (client_name, client_phone) = client
            .map(|c| (c.name, c.phone))
            .unwrap_or_default();

        Ok(PurchaseOrderDetail {
            po_no: order.id,
            order_date: order.order_date,
            status: order.status,
            client_id: order.client_id,
            client_name,
            client_phone,
            lines,
            total,
        })
    }
}
