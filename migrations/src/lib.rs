pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_parts_table;
mod m20250301_000002_create_clients_table;
mod m20250301_000003_create_purchase_orders_table;
mod m20250301_000004_create_line_items_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_parts_table::Migration),
            Box::new(m20250301_000002_create_clients_table::Migration),
            Box::new(m20250301_000003_create_purchase_orders_table::Migration),
            Box::new(m20250301_000004_create_line_items_table::Migration),
        ]
    }
}
