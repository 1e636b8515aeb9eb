//! Product (catalog entry identified by SKU).

use serde::{Deserialize, Serialize};

use stockroom_core::{ProductId, Sku};

/// A product that can appear on shipment lines.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Stock-keeping unit, unique across all products.
    pub sku: Sku,
}

/// Input for creating a new product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    /// Display name (must be non-empty).
    pub name: String,
    /// Stock-keeping unit; uniqueness is enforced at write time.
    pub sku: Sku,
}
