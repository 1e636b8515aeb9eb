//! In-memory storage backend.
//!
//! Intended for tests and local development. Not optimized for performance;
//! a single `RwLock` guards all tables, which also makes shipment creation
//! trivially atomic.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use stockroom_core::{ProductId, ShipmentId, ShipmentLineId, StoreId, SupplierId};

use crate::models::{
    LineRecord, NewProduct, NewShipment, NewStore, NewSupplier, Product, Shipment,
    ShipmentFilter, ShipmentLine, ShipmentRecord, Store, Supplier,
};

use super::{InventoryStore, RepositoryError};

#[derive(Debug, Default)]
struct Tables {
    stores: BTreeMap<i32, Store>,
    products: BTreeMap<i32, Product>,
    suppliers: BTreeMap<i32, Supplier>,
    shipments: BTreeMap<i32, Shipment>,
    lines: BTreeMap<i32, ShipmentLine>,
    next_id: i32,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn assemble(&self, shipment: &Shipment) -> Result<ShipmentRecord, RepositoryError> {
        let store = self
            .stores
            .get(&shipment.store_id.as_i32())
            .ok_or_else(|| dangling("store", shipment.store_id.as_i32()))?;
        let supplier = self
            .suppliers
            .get(&shipment.supplier_id.as_i32())
            .ok_or_else(|| dangling("supplier", shipment.supplier_id.as_i32()))?;

        // BTreeMap iteration gives id-ascending line order.
        let lines = self
            .lines
            .values()
            .filter(|line| line.shipment_id == shipment.id)
            .map(|line| {
                let product = self
                    .products
                    .get(&line.product_id.as_i32())
                    .ok_or_else(|| dangling("product", line.product_id.as_i32()))?;
                Ok(LineRecord {
                    line: line.clone(),
                    product_name: product.name.clone(),
                })
            })
            .collect::<Result<Vec<_>, RepositoryError>>()?;

        Ok(ShipmentRecord {
            shipment: shipment.clone(),
            store_name: store.name.clone(),
            supplier_name: supplier.name.clone(),
            lines,
        })
    }

    fn delete_shipments_where(&mut self, keep: impl Fn(&Shipment) -> bool) {
        let doomed: Vec<i32> = self
            .shipments
            .values()
            .filter(|s| !keep(s))
            .map(|s| s.id.as_i32())
            .collect();
        for id in doomed {
            self.shipments.remove(&id);
            self.lines
                .retain(|_, line| line.shipment_id.as_i32() != id);
        }
    }
}

fn dangling(entity: &str, id: i32) -> RepositoryError {
    RepositoryError::DataCorruption(format!("shipment references missing {entity} {id}"))
}

fn name_matches(name: &str, q: Option<&str>) -> bool {
    match q {
        Some(q) => name.to_lowercase().contains(&q.to_lowercase()),
        None => true,
    }
}

/// Process-local [`InventoryStore`] backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // Lock poisoning only happens after a panic in a writer; propagating
    // the panic is the correct response for this backend.

    #[allow(clippy::unwrap_used)]
    fn read(&self) -> std::sync::RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap()
    }

    #[allow(clippy::unwrap_used)]
    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap()
    }
}

#[async_trait]
impl InventoryStore for MemoryStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn create_store(&self, input: NewStore) -> Result<Store, RepositoryError> {
        let mut tables = self.write();
        let id = StoreId::new(tables.next_id());
        let store = Store {
            id,
            name: input.name,
            address: input.address,
        };
        tables.stores.insert(id.as_i32(), store.clone());
        Ok(store)
    }

    async fn get_store(&self, id: StoreId) -> Result<Option<Store>, RepositoryError> {
        Ok(self.read().stores.get(&id.as_i32()).cloned())
    }

    async fn list_stores(&self, q: Option<&str>) -> Result<Vec<Store>, RepositoryError> {
        Ok(self
            .read()
            .stores
            .values()
            .filter(|s| name_matches(&s.name, q))
            .cloned()
            .collect())
    }

    async fn delete_store(&self, id: StoreId) -> Result<bool, RepositoryError> {
        let mut tables = self.write();
        if tables.stores.remove(&id.as_i32()).is_none() {
            return Ok(false);
        }
        tables.delete_shipments_where(|s| s.store_id != id);
        Ok(true)
    }

    async fn create_product(&self, input: NewProduct) -> Result<Product, RepositoryError> {
        let mut tables = self.write();
        if tables.products.values().any(|p| p.sku == input.sku) {
            return Err(RepositoryError::Conflict(format!(
                "sku {} is already in use",
                input.sku
            )));
        }
        let id = ProductId::new(tables.next_id());
        let product = Product {
            id,
            name: input.name,
            sku: input.sku,
        };
        tables.products.insert(id.as_i32(), product.clone());
        Ok(product)
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        Ok(self.read().products.get(&id.as_i32()).cloned())
    }

    async fn list_products(&self, q: Option<&str>) -> Result<Vec<Product>, RepositoryError> {
        Ok(self
            .read()
            .products
            .values()
            .filter(|p| name_matches(&p.name, q))
            .cloned()
            .collect())
    }

    async fn delete_product(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let mut tables = self.write();
        if tables.products.remove(&id.as_i32()).is_none() {
            return Ok(false);
        }
        // Lines referencing the product go; shipment headers survive.
        tables.lines.retain(|_, line| line.product_id != id);
        Ok(true)
    }

    async fn create_supplier(&self, input: NewSupplier) -> Result<Supplier, RepositoryError> {
        let mut tables = self.write();
        let id = SupplierId::new(tables.next_id());
        let supplier = Supplier {
            id,
            name: input.name,
            contact_email: input.contact_email,
        };
        tables.suppliers.insert(id.as_i32(), supplier.clone());
        Ok(supplier)
    }

    async fn get_supplier(&self, id: SupplierId) -> Result<Option<Supplier>, RepositoryError> {
        Ok(self.read().suppliers.get(&id.as_i32()).cloned())
    }

    async fn list_suppliers(&self, q: Option<&str>) -> Result<Vec<Supplier>, RepositoryError> {
        Ok(self
            .read()
            .suppliers
            .values()
            .filter(|s| name_matches(&s.name, q))
            .cloned()
            .collect())
    }

    async fn delete_supplier(&self, id: SupplierId) -> Result<bool, RepositoryError> {
        let mut tables = self.write();
        if tables.suppliers.remove(&id.as_i32()).is_none() {
            return Ok(false);
        }
        tables.delete_shipments_where(|s| s.supplier_id != id);
        Ok(true)
    }

    async fn create_shipment(
        &self,
        input: NewShipment,
    ) -> Result<ShipmentRecord, RepositoryError> {
        let mut tables = self.write();

        // All references are checked before anything is inserted, so a
        // failure leaves no orphaned header.
        if !tables.stores.contains_key(&input.store_id.as_i32()) {
            return Err(RepositoryError::MissingReference {
                field: "store_id",
                id: input.store_id.as_i32(),
            });
        }
        if !tables.suppliers.contains_key(&input.supplier_id.as_i32()) {
            return Err(RepositoryError::MissingReference {
                field: "supplier_id",
                id: input.supplier_id.as_i32(),
            });
        }
        for item in &input.items {
            if !tables.products.contains_key(&item.product_id.as_i32()) {
                return Err(RepositoryError::MissingReference {
                    field: "product_id",
                    id: item.product_id.as_i32(),
                });
            }
        }

        let shipment_id = ShipmentId::new(tables.next_id());
        let shipment = Shipment {
            id: shipment_id,
            store_id: input.store_id,
            supplier_id: input.supplier_id,
            date: input.date,
        };
        tables.shipments.insert(shipment_id.as_i32(), shipment.clone());

        for item in input.items {
            let line_id = ShipmentLineId::new(tables.next_id());
            tables.lines.insert(
                line_id.as_i32(),
                ShipmentLine {
                    id: line_id,
                    shipment_id,
                    product_id: item.product_id,
                    quantity: item.quantity,
                    price_per_unit: item.price_per_unit,
                },
            );
        }

        tables.assemble(&shipment)
    }

    async fn get_shipment(
        &self,
        id: ShipmentId,
    ) -> Result<Option<ShipmentRecord>, RepositoryError> {
        let tables = self.read();
        match tables.shipments.get(&id.as_i32()) {
            Some(shipment) => Ok(Some(tables.assemble(shipment)?)),
            None => Ok(None),
        }
    }

    async fn list_shipments(
        &self,
        filter: &ShipmentFilter,
    ) -> Result<Vec<ShipmentRecord>, RepositoryError> {
        let tables = self.read();
        tables
            .shipments
            .values()
            .filter(|s| filter.matches(s))
            .map(|s| tables.assemble(s))
            .collect()
    }

    async fn delete_shipment(&self, id: ShipmentId) -> Result<bool, RepositoryError> {
        let mut tables = self.write();
        if tables.shipments.remove(&id.as_i32()).is_none() {
            return Ok(false);
        }
        tables.lines.retain(|_, line| line.shipment_id != id);
        Ok(true)
    }
}
