//! Demo catalog used by the seed binary, the `seed_demo_data` startup flag
//! and the integration tests.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, PaginatorTrait, Set};
use tracing::info;

use crate::entities::{client, part};
use crate::errors::ServiceError;

/// Parts loaded into an empty catalog: (description, price, quantity on hand)
pub const DEMO_PARTS: [(&str, Decimal, i32); 5] = [
    ("Concrete Mix", dec!(15.99), 100),
    ("Steel Beam", dec!(120.50), 25),
    ("Lumber 2x4", dec!(5.75), 200),
    ("Paint - White", dec!(28.99), 50),
    ("Drywall Sheet", dec!(12.25), 75),
];

/// Clients loaded into an empty client table: (name, phone)
pub const DEMO_CLIENTS: [(&str, &str); 3] = [
    ("ABC Construction", "555-123-4567"),
    ("XYZ Builders", "555-987-6543"),
    ("HomeMax Renovations", "555-246-8135"),
];

/// Counts of rows written by [`seed_demo_data`]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub parts: usize,
    pub clients: usize,
}

/// Loads the demo parts and clients.
///
/// Each table is only filled when it is empty, so running this twice is safe.
pub async fn seed_demo_data<C>(db: &C) -> Result<SeedSummary, ServiceError>
where
    C: ConnectionTrait,
{
    let mut summary = SeedSummary::default();

    if part::Entity::find().count(db).await? == 0 {
        for (description, price, quantity_on_hand) in DEMO_PARTS {
            part::ActiveModel {
                description: Set(description.to_string()),
                price: Set(price),
                quantity_on_hand: Set(quantity_on_hand),
                ..Default::default()
            }
            .insert(db)
            .await?;
            summary.parts += 1;
        }
    } else {
        info!("Parts table already populated; skipping demo parts");
    }

    if client::Entity::find().count(db).await? == 0 {
        for (name, phone) in DEMO_CLIENTS {
            client::ActiveModel {
                name: Set(name.to_string()),
                phone: Set(phone.to_string()),
                balance: Set(Decimal::ZERO),
                ..Default::default()
            }
            .insert(db)
            .await?;
            summary.clients += 1;
        }
    } else {
        info!("Clients table already populated; skipping demo clients");
    }

    info!(
        parts = summary.parts,
        clients = summary.clients,
        "Demo data seeded"
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{establish_connection_with_config, run_migrations, DbConfig};

    #[tokio::test]
    async fn seeding_twice_only_inserts_once() {
        let db = establish_connection_with_config(&DbConfig::in_memory())
            .await
            .unwrap();
        run_migrations(&db).await.unwrap();

        let first = seed_demo_data(&db).await.unwrap();
        assert_eq!(first, SeedSummary { parts: 5, clients: 3 });

        let second = seed_demo_data(&db).await.unwrap();
        assert_eq!(second, SeedSummary::default());

        let steel = part::Entity::find_by_id(2).one(&db).await.unwrap().unwrap();
        assert_eq!(steel.description, "Steel Beam");
        assert_eq!(steel.quantity_on_hand, 25);
    }
}
