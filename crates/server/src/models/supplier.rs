//! Supplier (source of shipments).

use serde::{Deserialize, Serialize};

use stockroom_core::{Email, SupplierId};

/// A supplier that sends shipments to stores.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Supplier {
    /// Unique supplier ID.
    pub id: SupplierId,
    /// Display name.
    pub name: String,
    /// Contact email, syntactically validated.
    pub contact_email: Email,
}

/// Input for creating a new supplier.
#[derive(Debug, Clone)]
pub struct NewSupplier {
    /// Display name (must be non-empty).
    pub name: String,
    /// Contact email.
    pub contact_email: Email,
}
