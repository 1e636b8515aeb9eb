//! Core types for Stockroom.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod price;
pub mod quantity;
pub mod sku;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::{PriceError, UnitPrice};
pub use quantity::{Quantity, QuantityError};
pub use sku::{Sku, SkuError};
