//! Storage layer: the [`InventoryStore`] interface and its backends.
//!
//! The API depends on storage only through [`InventoryStore`]: per entity
//! kind it needs insert, get-by-id, filtered listing, and cascade delete.
//! Two backends implement it:
//!
//! - [`MemoryStore`] - process-local, used by tests and when no database URL
//!   is configured
//! - [`PgStore`] - `PostgreSQL` via sqlx; schema in `migrations/`
//!
//! Referential integrity and SKU uniqueness are enforced here (explicitly in
//! memory, by constraints in Postgres) and surfaced as typed errors.

pub mod memory;
pub mod postgres;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use stockroom_core::{ProductId, ShipmentId, StoreId, SupplierId};

use crate::models::{
    NewProduct, NewShipment, NewStore, NewSupplier, Product, ShipmentFilter, ShipmentRecord,
    Store, Supplier,
};

/// Embedded migrations for the `PostgreSQL` backend.
///
/// Run via `stockroom migrate`; the server does not migrate on startup.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g. duplicate SKU).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// A write referenced an entity that does not exist.
    #[error("{field} references missing id {id}")]
    MissingReference {
        /// Field holding the dangling reference (`store_id`, `supplier_id`,
        /// `product_id`).
        field: &'static str,
        /// The unresolved id.
        id: i32,
    },
}

/// Storage interface for the five entity kinds.
///
/// Listing order is id-ascending for every method, so results are
/// deterministic across backends. `q` parameters are case-insensitive
/// substring matches on the name field. Deletes return `false` when the id
/// did not exist.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Storage reachability probe for the readiness endpoint.
    async fn ping(&self) -> Result<(), RepositoryError>;

    // Stores

    async fn create_store(&self, input: NewStore) -> Result<Store, RepositoryError>;
    async fn get_store(&self, id: StoreId) -> Result<Option<Store>, RepositoryError>;
    async fn list_stores(&self, q: Option<&str>) -> Result<Vec<Store>, RepositoryError>;
    /// Deletes the store and, by cascade, its shipments and their lines.
    async fn delete_store(&self, id: StoreId) -> Result<bool, RepositoryError>;

    // Products

    /// Fails with [`RepositoryError::Conflict`] when the SKU is taken.
    async fn create_product(&self, input: NewProduct) -> Result<Product, RepositoryError>;
    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;
    async fn list_products(&self, q: Option<&str>) -> Result<Vec<Product>, RepositoryError>;
    /// Deletes the product and, by cascade, the shipment lines that
    /// reference it. Shipment headers survive.
    async fn delete_product(&self, id: ProductId) -> Result<bool, RepositoryError>;

    // Suppliers

    async fn create_supplier(&self, input: NewSupplier) -> Result<Supplier, RepositoryError>;
    async fn get_supplier(&self, id: SupplierId) -> Result<Option<Supplier>, RepositoryError>;
    async fn list_suppliers(&self, q: Option<&str>) -> Result<Vec<Supplier>, RepositoryError>;
    /// Deletes the supplier and, by cascade, its shipments and their lines.
    async fn delete_supplier(&self, id: SupplierId) -> Result<bool, RepositoryError>;

    // Shipments

    /// Persists header and lines as one atomic unit.
    ///
    /// Fails with [`RepositoryError::MissingReference`] if the store,
    /// supplier, or any line's product does not exist; nothing is written in
    /// that case.
    async fn create_shipment(&self, input: NewShipment)
    -> Result<ShipmentRecord, RepositoryError>;
    async fn get_shipment(
        &self,
        id: ShipmentId,
    ) -> Result<Option<ShipmentRecord>, RepositoryError>;
    async fn list_shipments(
        &self,
        filter: &ShipmentFilter,
    ) -> Result<Vec<ShipmentRecord>, RepositoryError>;
    /// Deletes the shipment and its lines.
    async fn delete_shipment(&self, id: ShipmentId) -> Result<bool, RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
