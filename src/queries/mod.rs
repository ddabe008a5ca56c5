use async_trait::async_trait;

use crate::{db::DatabaseAccess, errors::ServiceError};

pub mod catalog_queries;
pub mod purchase_order_queries;

pub use catalog_queries::{ClientView, ListClientsQuery, ListPartsQuery, PartView};
pub use purchase_order_queries::{
    GetPurchaseOrderDetailQuery, ListPurchaseOrdersQuery, PurchaseOrderDetail,
    PurchaseOrderLineView, PurchaseOrderSummary,
};

/// Trait representing a generic asynchronous read-only query.
#[async_trait]
pub trait Query: Send + Sync {
    type Result: Send + Sync;

    /// Executes the query against the shared connection pool.
    async fn execute(&self, db: &DatabaseAccess) -> Result<Self::Result, ServiceError>;
}
