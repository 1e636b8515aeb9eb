//! Store (physical location receiving shipments).

use serde::{Deserialize, Serialize};

use stockroom_core::StoreId;

/// A store that receives shipments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Store {
    /// Unique store ID.
    pub id: StoreId,
    /// Display name.
    pub name: String,
    /// Street address.
    pub address: String,
}

/// Input for creating a new store.
#[derive(Debug, Clone, Deserialize)]
pub struct NewStore {
    /// Display name (must be non-empty).
    pub name: String,
    /// Street address.
    pub address: String,
}
