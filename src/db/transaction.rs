/*!
 * Transaction Helper Utilities
 *
 * Scoped transactions: the work commits only when the closure returns `Ok`.
 * Any error, early return or dropped future rolls back every write made
 * through the transaction handle.
 */

use futures::future::BoxFuture;
use metrics::{counter, histogram};
use sea_orm::{DatabaseConnection, DatabaseTransaction, DbErr, TransactionError, TransactionTrait};
use std::time::Instant;
use tracing::{debug, warn};
use uuid::Uuid;

/// Execute a function within a database transaction
///
/// The closure receives the open transaction and must return a boxed future.
/// Anything it needs from the caller has to be moved or cloned in, since the
/// future may only borrow the transaction itself.
///
/// # Example
///
/// ```rust,ignore
/// use crate::db::transaction::with_transaction;
///
/// let po_no = with_transaction(&db, move |txn| {
///     Box::pin(async move {
///         let po_no = OrderRepository::insert_order(txn, client_id, now, status).await?;
///         CatalogRepository::decrement_stock(txn, part_id, qty).await?;
///         Ok::<_, ServiceError>(po_no)
///     })
/// })
/// .await?;
/// ```
pub async fn with_transaction<F, T, E>(db: &DatabaseConnection, f: F) -> Result<T, E>
where
    F: for<'c> FnOnce(&'c DatabaseTransaction) -> BoxFuture<'c, Result<T, E>> + Send,
    T: Send,
    E: From<DbErr> + std::error::Error + Send,
{
    let transaction_id = Uuid::new_v4();
    let start = Instant::now();

    debug!(transaction_id = %transaction_id, "Starting database transaction");
    counter!("inventory_db.transaction.started", 1);

    let result = db.transaction(f).await;

    let elapsed = start.elapsed();
    histogram!("inventory_db.transaction.duration", elapsed);

    match &result {
        Ok(_) => {
            counter!("inventory_db.transaction.committed", 1);
            debug!(transaction_id = %transaction_id, "Transaction committed in {:?}", elapsed);
        }
        Err(e) => {
            counter!("inventory_db.transaction.rolled_back", 1);
            warn!(transaction_id = %transaction_id, error = %e, "Transaction rolled back after {:?}", elapsed);
        }
    }

    result.map_err(|e| match e {
        TransactionError::Connection(db_err) => E::from(db_err),
        TransactionError::Transaction(err) => err,
    })
}
