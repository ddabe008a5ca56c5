use sea_orm_migration::prelude::*;

use super::m20250301_000002_create_clients_table::Clients;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PurchaseOrders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PurchaseOrders::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PurchaseOrders::ClientId).integer().not_null())
                    .col(
                        ColumnDef::new(PurchaseOrders::OrderDate)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(PurchaseOrders::Status)
                            .string()
                            .not_null()
                            .default("New"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_purchase_orders_client_id")
                            .from(PurchaseOrders::Table, PurchaseOrders::ClientId)
                            .to(Clients::Table, Clients::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_purchase_orders_client_id")
                    .table(PurchaseOrders::Table)
                    .col(PurchaseOrders::ClientId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PurchaseOrders::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum PurchaseOrders {
    Table,
    Id,
    ClientId,
    OrderDate,
    Status,
}
