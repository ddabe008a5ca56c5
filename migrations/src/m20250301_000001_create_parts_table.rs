use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Parts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Parts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Parts::Description).string().not_null())
                    .col(ColumnDef::new(Parts::Price).decimal_len(12, 2).not_null())
                    // Stock never goes negative, even if an application check is skipped
                    .col(
                        ColumnDef::new(Parts::QuantityOnHand)
                            .integer()
                            .not_null()
                            .check(Expr::col(Parts::QuantityOnHand).gte(0)),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Parts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Parts {
    Table,
    Id,
    Description,
    Price,
    QuantityOnHand,
}
