use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use std::sync::Arc;

use crate::entities::{client, line_item, part, purchase_order};
use crate::errors::ServiceError;
use crate::repositories::Repository;

use super::BaseRepository;

/// A purchase-order line ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct NewLineItem {
    pub purchase_order_id: i32,
    pub line_no: i32,
    pub part_id: i32,
    pub quantity: i32,
    pub price: Decimal,
}

impl NewLineItem {
    pub fn extended_price(&self) -> Decimal {
        Decimal::from(self.quantity) * self.price
    }
}

/// Repository for purchase orders and their line items
#[derive(Debug, Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All purchase orders with their client, ordered by PO number
    pub async fn list_with_clients(
        &self,
    ) -> Result<Vec<(purchase_order::Model, Option<client::Model>)>, ServiceError> {
        purchase_order::Entity::find()
            .find_also_related(client::Entity)
            .order_by_asc(purchase_order::Column::Id)
            .all(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    pub async fn find_with_client(
        &self,
        po_no: i32,
    ) -> Result<Option<(purchase_order::Model, Option<client::Model>)>, ServiceError> {
        purchase_order::Entity::find_by_id(po_no)
            .find_also_related(client::Entity)
            .one(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Lines of one order with their part, ordered by line number
    pub async fn lines_with_parts(
        &self,
        po_no: i32,
    ) -> Result<Vec<(line_item::Model, Option<part::Model>)>, ServiceError> {
        line_item::Entity::find()
            .filter(line_item::Column::PurchaseOrderId.eq(po_no))
            .find_also_related(part::Entity)
            .order_by_asc(line_item::Column::LineNo)
            .all(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Creates an order header and returns its PO number
    pub async fn insert_order<C>(
        conn: &C,
        client_id: i32,
        order_date: DateTime<Utc>,
        status: &str,
    ) -> Result<i32, ServiceError>
    where
        C: ConnectionTrait,
    {
        let header = purchase_order::ActiveModel {
            client_id: Set(client_id),
            order_date: Set(order_date),
            status: Set(status.to_string()),
            ..Default::default()
        };

        let result = purchase_order::Entity::insert(header).exec(conn).await?;
        Ok(result.last_insert_id)
    }

    /// Writes one line item and charges it to the owning client.
    ///
    /// The balance moves by `quantity * price` in the same statement sequence
    /// as the insert; callers run this inside their transaction so both
    /// writes commit or roll back together.
    pub async fn insert_line_item<C>(conn: &C, line: NewLineItem) -> Result<(), ServiceError>
    where
        C: ConnectionTrait,
    {
        let order = purchase_order::Entity::find_by_id(line.purchase_order_id)
            .one(conn)
            .await?
            .ok_or_else(|| {
                ServiceError::db_error(format!(
                    "purchase order {} does not exist",
                    line.purchase_order_id
                ))
            })?;

        let delta = line.extended_price();

        line_item::Entity::insert(line_item::ActiveModel {
            purchase_order_id: Set(line.purchase_order_id),
            line_no: Set(line.line_no),
            part_id: Set(line.part_id),
            quantity: Set(line.quantity),
            price: Set(line.price),
        })
        .exec_without_returning(conn)
        .await?;

        let result = client::Entity::update_many()
            .col_expr(
                client::Column::Balance,
                Expr::col(client::Column::Balance).add(delta),
            )
            .filter(client::Column::Id.eq(order.client_id))
            .exec(conn)
            .await?;

        if result.rows_affected != 1 {
            return Err(ServiceError::db_error(format!(
                "balance update for client {} affected {} rows",
                order.client_id, result.rows_affected
            )));
        }

        Ok(())
    }
}
