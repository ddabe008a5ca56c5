use sea_orm_migration::prelude::*;

use super::m20250301_000001_create_parts_table::Parts;
use super::m20250301_000003_create_purchase_orders_table::PurchaseOrders;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LineItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LineItems::PurchaseOrderId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(LineItems::LineNo).integer().not_null())
                    .col(ColumnDef::new(LineItems::PartId).integer().not_null())
                    .col(
                        ColumnDef::new(LineItems::Quantity)
                            .integer()
                            .not_null()
                            .check(Expr::col(LineItems::Quantity).gt(0)),
                    )
                    .col(ColumnDef::new(LineItems::Price).decimal_len(12, 2).not_null())
                    .primary_key(
                        Index::create()
                            .col(LineItems::PurchaseOrderId)
                            .col(LineItems::LineNo),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_line_items_purchase_order_id")
                            .from(LineItems::Table, LineItems::PurchaseOrderId)
                            .to(PurchaseOrders::Table, PurchaseOrders::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_line_items_part_id")
                            .from(LineItems::Table, LineItems::PartId)
                            .to(Parts::Table, Parts::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LineItems::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum LineItems {
    Table,
    PurchaseOrderId,
    LineNo,
    PartId,
    Quantity,
    Price,
}
