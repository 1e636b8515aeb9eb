//! `PostgreSQL` storage backend.
//!
//! Referential integrity, cascade deletes, and SKU uniqueness live in the
//! schema (see `migrations/`); this module maps constraint failures to
//! [`RepositoryError`] variants. Shipment creation runs in a transaction so
//! a rejected line never leaves an orphaned header behind.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use stockroom_core::{
    Email, ProductId, Quantity, ShipmentId, ShipmentLineId, Sku, StoreId, SupplierId, UnitPrice,
};

use crate::models::{
    LineRecord, NewProduct, NewShipment, NewStore, NewSupplier, Product, Shipment,
    ShipmentFilter, ShipmentLine, ShipmentRecord, Store, Supplier,
};

use super::{InventoryStore, RepositoryError};

/// [`InventoryStore`] backend over a `PostgreSQL` pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wrap an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct StoreRow {
    id: StoreId,
    name: String,
    address: String,
}

impl From<StoreRow> for Store {
    fn from(row: StoreRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            address: row.address,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    name: String,
    sku: Sku,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            sku: row.sku,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SupplierRow {
    id: SupplierId,
    name: String,
    contact_email: Email,
}

impl From<SupplierRow> for Supplier {
    fn from(row: SupplierRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            contact_email: row.contact_email,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ShipmentHeaderRow {
    id: ShipmentId,
    store_id: StoreId,
    supplier_id: SupplierId,
    date: DateTime<Utc>,
    store_name: String,
    supplier_name: String,
}

#[derive(sqlx::FromRow)]
struct ShipmentLineRow {
    id: ShipmentLineId,
    shipment_id: ShipmentId,
    product_id: ProductId,
    quantity: Quantity,
    price_per_unit: UnitPrice,
    product_name: String,
}

impl From<ShipmentLineRow> for LineRecord {
    fn from(row: ShipmentLineRow) -> Self {
        Self {
            line: ShipmentLine {
                id: row.id,
                shipment_id: row.shipment_id,
                product_id: row.product_id,
                quantity: row.quantity,
                price_per_unit: row.price_per_unit,
            },
            product_name: row.product_name,
        }
    }
}

/// Escape LIKE metacharacters so `q` is treated as a literal substring.
fn like_pattern(q: &str) -> String {
    let escaped = q.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_");
    format!("%{escaped}%")
}

const SHIPMENT_HEADER_SELECT: &str = "\
    SELECT s.id, s.store_id, s.supplier_id, s.date, \
           st.name AS store_name, su.name AS supplier_name \
    FROM shipments s \
    JOIN stores st ON st.id = s.store_id \
    JOIN suppliers su ON su.id = s.supplier_id";

const SHIPMENT_LINE_SELECT: &str = "\
    SELECT l.id, l.shipment_id, l.product_id, l.quantity, l.price_per_unit, \
           p.name AS product_name \
    FROM shipment_lines l \
    JOIN products p ON p.id = l.product_id";

#[async_trait]
impl InventoryStore for PgStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn create_store(&self, input: NewStore) -> Result<Store, RepositoryError> {
        let row: StoreRow = sqlx::query_as(
            "INSERT INTO stores (name, address) VALUES ($1, $2) RETURNING id, name, address",
        )
        .bind(&input.name)
        .bind(&input.address)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn get_store(&self, id: StoreId) -> Result<Option<Store>, RepositoryError> {
        let row: Option<StoreRow> =
            sqlx::query_as("SELECT id, name, address FROM stores WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(Into::into))
    }

    async fn list_stores(&self, q: Option<&str>) -> Result<Vec<Store>, RepositoryError> {
        let rows: Vec<StoreRow> = sqlx::query_as(
            "SELECT id, name, address FROM stores \
             WHERE ($1::text IS NULL OR name ILIKE $1) \
             ORDER BY id",
        )
        .bind(q.map(like_pattern))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn delete_store(&self, id: StoreId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM stores WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_product(&self, input: NewProduct) -> Result<Product, RepositoryError> {
        let row: Result<ProductRow, sqlx::Error> = sqlx::query_as(
            "INSERT INTO products (name, sku) VALUES ($1, $2) RETURNING id, name, sku",
        )
        .bind(&input.name)
        .bind(&input.sku)
        .fetch_one(&self.pool)
        .await;
        match row {
            Ok(row) => Ok(row.into()),
            Err(err) if is_unique_violation(&err) => Err(RepositoryError::Conflict(format!(
                "sku {} is already in use",
                input.sku
            ))),
            Err(err) => Err(err.into()),
        }
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> =
            sqlx::query_as("SELECT id, name, sku FROM products WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(Into::into))
    }

    async fn list_products(&self, q: Option<&str>) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> = sqlx::query_as(
            "SELECT id, name, sku FROM products \
             WHERE ($1::text IS NULL OR name ILIKE $1) \
             ORDER BY id",
        )
        .bind(q.map(like_pattern))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn delete_product(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_supplier(&self, input: NewSupplier) -> Result<Supplier, RepositoryError> {
        let row: SupplierRow = sqlx::query_as(
            "INSERT INTO suppliers (name, contact_email) VALUES ($1, $2) \
             RETURNING id, name, contact_email",
        )
        .bind(&input.name)
        .bind(&input.contact_email)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn get_supplier(&self, id: SupplierId) -> Result<Option<Supplier>, RepositoryError> {
        let row: Option<SupplierRow> =
            sqlx::query_as("SELECT id, name, contact_email FROM suppliers WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(Into::into))
    }

    async fn list_suppliers(&self, q: Option<&str>) -> Result<Vec<Supplier>, RepositoryError> {
        let rows: Vec<SupplierRow> = sqlx::query_as(
            "SELECT id, name, contact_email FROM suppliers \
             WHERE ($1::text IS NULL OR name ILIKE $1) \
             ORDER BY id",
        )
        .bind(q.map(like_pattern))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn delete_supplier(&self, id: SupplierId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM suppliers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_shipment(
        &self,
        input: NewShipment,
    ) -> Result<ShipmentRecord, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        // References are verified inside the transaction so the error can
        // name the offending field and id instead of surfacing a raw FK
        // violation.
        let store_exists: Option<(i32,)> =
            sqlx::query_as("SELECT id FROM stores WHERE id = $1")
                .bind(input.store_id)
                .fetch_optional(&mut *tx)
                .await?;
        if store_exists.is_none() {
            return Err(RepositoryError::MissingReference {
                field: "store_id",
                id: input.store_id.as_i32(),
            });
        }
        let supplier_exists: Option<(i32,)> =
            sqlx::query_as("SELECT id FROM suppliers WHERE id = $1")
                .bind(input.supplier_id)
                .fetch_optional(&mut *tx)
                .await?;
        if supplier_exists.is_none() {
            return Err(RepositoryError::MissingReference {
                field: "supplier_id",
                id: input.supplier_id.as_i32(),
            });
        }

        let (shipment_id,): (ShipmentId,) = sqlx::query_as(
            "INSERT INTO shipments (store_id, supplier_id, date) VALUES ($1, $2, $3) \
             RETURNING id",
        )
        .bind(input.store_id)
        .bind(input.supplier_id)
        .bind(input.date)
        .fetch_one(&mut *tx)
        .await?;

        for item in &input.items {
            let inserted = sqlx::query(
                "INSERT INTO shipment_lines (shipment_id, product_id, quantity, price_per_unit) \
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(shipment_id)
            .bind(item.product_id)
            .bind(item.quantity)
            .bind(item.price_per_unit)
            .execute(&mut *tx)
            .await;
            match inserted {
                Ok(_) => {}
                Err(err) if is_foreign_key_violation(&err) => {
                    return Err(RepositoryError::MissingReference {
                        field: "product_id",
                        id: item.product_id.as_i32(),
                    });
                }
                Err(err) => return Err(err.into()),
            }
        }

        tx.commit().await?;

        self.get_shipment(shipment_id).await?.ok_or_else(|| {
            RepositoryError::DataCorruption(format!(
                "shipment {shipment_id} vanished after commit"
            ))
        })
    }

    async fn get_shipment(
        &self,
        id: ShipmentId,
    ) -> Result<Option<ShipmentRecord>, RepositoryError> {
        let header: Option<ShipmentHeaderRow> =
            sqlx::query_as(&format!("{SHIPMENT_HEADER_SELECT} WHERE s.id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        let Some(header) = header else {
            return Ok(None);
        };

        let lines: Vec<ShipmentLineRow> =
            sqlx::query_as(&format!(
                "{SHIPMENT_LINE_SELECT} WHERE l.shipment_id = $1 ORDER BY l.id"
            ))
            .bind(id)
            .fetch_all(&self.pool)
            .await?;

        Ok(Some(ShipmentRecord {
            shipment: Shipment {
                id: header.id,
                store_id: header.store_id,
                supplier_id: header.supplier_id,
                date: header.date,
            },
            store_name: header.store_name,
            supplier_name: header.supplier_name,
            lines: lines.into_iter().map(Into::into).collect(),
        }))
    }

    async fn list_shipments(
        &self,
        filter: &ShipmentFilter,
    ) -> Result<Vec<ShipmentRecord>, RepositoryError> {
        let headers: Vec<ShipmentHeaderRow> = sqlx::query_as(&format!(
            "{SHIPMENT_HEADER_SELECT} \
             WHERE ($1::int4 IS NULL OR s.store_id = $1) \
               AND ($2::int4 IS NULL OR s.supplier_id = $2) \
               AND ($3::timestamptz IS NULL OR s.date >= $3) \
               AND ($4::timestamptz IS NULL OR s.date <= $4) \
             ORDER BY s.id"
        ))
        .bind(filter.store_id.map(|id| id.as_i32()))
        .bind(filter.supplier_id.map(|id| id.as_i32()))
        .bind(filter.date_from)
        .bind(filter.date_to)
        .fetch_all(&self.pool)
        .await?;

        if headers.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = headers.iter().map(|h| h.id.as_i32()).collect();
        let lines: Vec<ShipmentLineRow> = sqlx::query_as(&format!(
            "{SHIPMENT_LINE_SELECT} WHERE l.shipment_id = ANY($1) ORDER BY l.id"
        ))
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut lines_by_shipment: HashMap<i32, Vec<LineRecord>> = HashMap::new();
        for row in lines {
            lines_by_shipment
                .entry(row.shipment_id.as_i32())
                .or_default()
                .push(row.into());
        }

        Ok(headers
            .into_iter()
            .map(|header| {
                let lines = lines_by_shipment
                    .remove(&header.id.as_i32())
                    .unwrap_or_default();
                ShipmentRecord {
                    shipment: Shipment {
                        id: header.id,
                        store_id: header.store_id,
                        supplier_id: header.supplier_id,
                        date: header.date,
                    },
                    store_name: header.store_name,
                    supplier_name: header.supplier_name,
                    lines,
                }
            })
            .collect())
    }

    async fn delete_shipment(&self, id: ShipmentId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM shipments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}
