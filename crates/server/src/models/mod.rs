//! Domain models: entities, write inputs, and filters.
//!
//! Models are storage-agnostic; both the in-memory and `PostgreSQL` backends
//! produce and consume these types. Derived shipment totals live on
//! [`shipment::ShipmentRecord`] and are recomputed on every read.

pub mod product;
pub mod shipment;
pub mod store;
pub mod supplier;

pub use product::{NewProduct, Product};
pub use shipment::{
    LineRecord, NewShipment, NewShipmentLine, Shipment, ShipmentFilter, ShipmentLine,
    ShipmentRecord,
};
pub use store::{NewStore, Store};
pub use supplier::{NewSupplier, Supplier};
