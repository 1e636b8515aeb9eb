//! Stockroom Core - Shared types library.
//!
//! This crate provides common types used across all Stockroom components:
//! - `server` - HTTP API for stores, products, suppliers, and shipments
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP.
//! Every field-level rule (price scale and magnitude, quantity positivity,
//! email shape, SKU shape) lives here so it is enforced identically on every
//! write path.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, quantities,
//!   emails, and SKUs

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
