//! Seed the database with sample data for local development.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;

use stockroom_core::{Email, Quantity, Sku, UnitPrice};
use stockroom_server::db::{InventoryStore, PgStore};
use stockroom_server::models::{NewProduct, NewShipment, NewShipmentLine, NewStore, NewSupplier};

use super::CommandError;

fn seed_err(err: impl std::fmt::Display) -> CommandError {
    CommandError::Seed(err.to_string())
}

/// Insert a small set of stores, products, suppliers, and shipments.
///
/// Not idempotent: running twice duplicates stores and suppliers and fails
/// on the product SKUs.
pub async fn run() -> Result<(), CommandError> {
    let pool = super::connect().await?;
    let store = PgStore::new(pool);

    tracing::info!("Seeding sample data...");

    let downtown = store
        .create_store(NewStore {
            name: "Downtown".to_string(),
            address: "1 Main St".to_string(),
        })
        .await
        .map_err(seed_err)?;
    let harbor = store
        .create_store(NewStore {
            name: "Harbor Outlet".to_string(),
            address: "2 Quay Rd".to_string(),
        })
        .await
        .map_err(seed_err)?;

    let acme = store
        .create_supplier(NewSupplier {
            name: "Acme Wholesale".to_string(),
            contact_email: Email::parse("orders@acme.example").map_err(seed_err)?,
        })
        .await
        .map_err(seed_err)?;

    let widget = store
        .create_product(NewProduct {
            name: "Widget".to_string(),
            sku: Sku::parse("WIDGET-001").map_err(seed_err)?,
        })
        .await
        .map_err(seed_err)?;
    let gadget = store
        .create_product(NewProduct {
            name: "Gadget".to_string(),
            sku: Sku::parse("GADGET-001").map_err(seed_err)?,
        })
        .await
        .map_err(seed_err)?;

    let now = Utc::now();
    for (target, days_ago, lines) in [
        (&downtown, 7, vec![(&widget, 10, "4.25"), (&gadget, 2, "19.99")]),
        (&downtown, 1, vec![(&widget, 5, "4.25")]),
        (&harbor, 3, vec![(&gadget, 8, "18.50")]),
    ] {
        let items = lines
            .into_iter()
            .map(|(product, quantity, price)| {
                Ok(NewShipmentLine {
                    product_id: product.id,
                    quantity: Quantity::new(quantity).map_err(seed_err)?,
                    price_per_unit: UnitPrice::new(
                        price.parse::<Decimal>().map_err(seed_err)?,
                    )
                    .map_err(seed_err)?,
                })
            })
            .collect::<Result<Vec<_>, CommandError>>()?;

        store
            .create_shipment(NewShipment {
                store_id: target.id,
                supplier_id: acme.id,
                date: now - Duration::days(days_ago),
                items,
            })
            .await
            .map_err(seed_err)?;
    }

    tracing::info!("Seed complete");
    Ok(())
}
