use sea_orm::{
    sea_query::Expr, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use std::sync::Arc;

use crate::entities::{client, part};
use crate::errors::ServiceError;
use crate::repositories::Repository;

use super::BaseRepository;

/// Repository for parts and clients.
///
/// The associated functions take any connection so they can run on the pool
/// or inside an open transaction.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    base: BaseRepository,
}

impl CatalogRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All parts, ordered by part number
    pub async fn list_parts(&self) -> Result<Vec<part::Model>, ServiceError> {
        part::Entity::find()
            .order_by_asc(part::Column::Id)
            .all(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// All clients, ordered by client id
    pub async fn list_clients(&self) -> Result<Vec<client::Model>, ServiceError> {
        client::Entity::find()
            .order_by_asc(client::Column::Id)
            .all(self.base.get_db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Looks up a part, taking a row lock on backends that support
    /// `SELECT ... FOR UPDATE`. SQLite relies on its database write lock.
    pub async fn find_part<C>(conn: &C, id: i32) -> Result<Option<part::Model>, ServiceError>
    where
        C: ConnectionTrait,
    {
        let mut select = part::Entity::find_by_id(id);
        if matches!(
            conn.get_database_backend(),
            DbBackend::Postgres | DbBackend::MySql
        ) {
            select = select.lock_exclusive();
        }
        select.one(conn).await.map_err(ServiceError::DatabaseError)
    }

    /// Takes the SQLite write lock at the start of a transaction.
    ///
    /// A deferred SQLite transaction that reads before it writes cannot wait
    /// for the lock when it later upgrades and fails with `SQLITE_BUSY`
    /// instead. Writing first makes concurrent submitters queue on the busy
    /// timeout. The update leaves the client row unchanged. Other backends
    /// rely on the row locks taken by [`CatalogRepository::find_part`].
    pub async fn claim_write_lock<C>(conn: &C, client_id: i32) -> Result<(), ServiceError>
    where
        C: ConnectionTrait,
    {
        if conn.get_database_backend() != DbBackend::Sqlite {
            return Ok(());
        }

        client::Entity::update_many()
            .col_expr(client::Column::Balance, Expr::col(client::Column::Balance).into())
            .filter(client::Column::Id.eq(client_id))
            .exec(conn)
            .await?;

        Ok(())
    }

    pub async fn find_client<C>(conn: &C, id: i32) -> Result<Option<client::Model>, ServiceError>
    where
        C: ConnectionTrait,
    {
        client::Entity::find_by_id(id)
            .one(conn)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Subtracts `qty` from a part's quantity on hand.
    ///
    /// Availability is the caller's responsibility; the only guard here is the
    /// non-negative check constraint on the column.
    pub async fn decrement_stock<C>(conn: &C, part_id: i32, qty: i32) -> Result<(), ServiceError>
    where
        C: ConnectionTrait,
    {
        let result = part::Entity::update_many()
            .col_expr(
                part::Column::QuantityOnHand,
                Expr::col(part::Column::QuantityOnHand).sub(qty),
            )
            .filter(part::Column::Id.eq(part_id))
            .exec(conn)
            .await?;

        if result.rows_affected != 1 {
            return Err(ServiceError::db_error(format!(
                "stock update for part {} affected {} rows",
                part_id, result.rows_affected
            )));
        }

        Ok(())
    }
}
