use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::Query;
use crate::{
    db::DatabaseAccess,
    entities::{client, part},
    errors::ServiceError,
    repositories::CatalogRepository,
    tracing::with_metrics,
};

/// A part as listed in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PartView {
    #[schema(example = 1)]
    pub part_no: i32,
    #[schema(example = "Concrete Mix")]
    pub description: String,
    #[schema(value_type = String, example = "15.99")]
    pub price: Decimal,
    #[schema(example = 100)]
    pub quantity_on_hand: i32,
}

impl From<part::Model> for PartView {
    fn from(model: part::Model) -> Self {
        Self {
            part_no: model.id,
            description: model.description,
            price: model.price.round_dp(2),
            quantity_on_hand: model.quantity_on_hand,
        }
    }
}

/// A client with the amount currently owed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientView {
    #[schema(example = 1)]
    pub client_id: i32,
    #[schema(example = "ABC Construction")]
    pub name: String,
    #[schema(example = "555-123-4567")]
    pub phone: String,
    #[schema(value_type = String, example = "159.90")]
    pub balance: Decimal,
}

impl From<client::Model> for ClientView {
    fn from(model: client::Model) -> Self {
        Self {
            client_id: model.id,
            name: model.name,
            phone: model.phone,
            balance: model.balance.round_dp(2),
        }
    }
}

/// Query listing every part, ordered by part number
#[derive(Debug, Default)]
pub struct ListPartsQuery;

#[async_trait]
impl Query for ListPartsQuery {
    type Result = Vec<PartView>;

    async fn execute(&self, db: &DatabaseAccess) -> Result<Self::Result, ServiceError> {
        let repo = CatalogRepository::new(db.shared_pool());
        let parts = with_metrics("list_parts", || repo.list_parts()).await?;
        Ok(parts.into_iter().map(PartView::from).collect())
    }
}

/// Query listing every client, ordered by client id
#[derive(Debug, Default)]
pub struct ListClientsQuery;

#[async_trait]
impl Query for ListClientsQuery {
    type Result = Vec<ClientView>;

    async fn execute(&self, db: &DatabaseAccess) -> Result<Self::Result, ServiceError> {
        let repo = CatalogRepository::new(db.shared_pool());
        let clients = with_metrics("list_clients", || repo.list_clients()).await?;
        Ok(clients.into_iter().map(ClientView::from).collect())
    }
}
