//! Stockroom server library.
//!
//! This crate provides the HTTP API as a library, allowing it to be tested
//! in-process and reused by the CLI.
//!
//! # Architecture
//!
//! - Axum web framework, JSON in and out
//! - Storage behind the [`db::InventoryStore`] trait: `PostgreSQL` when a
//!   database URL is configured, in-memory otherwise
//! - Field-level validation before any write (see `stockroom-core` types)
//! - Shipment totals derived on every read, never persisted

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
