//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health              - Liveness check
//! GET    /health/ready        - Readiness check (storage probe)
//!
//! # Stores
//! GET    /stores/             - List stores (?q= name search)
//! POST   /stores/             - Create store
//! DELETE /stores/{id}         - Delete store (cascades to its shipments)
//!
//! # Products
//! GET    /products/           - List products (?q= name search)
//! POST   /products/           - Create product (409 on duplicate SKU)
//! DELETE /products/{id}       - Delete product (cascades to its lines)
//!
//! # Suppliers
//! GET    /suppliers/          - List suppliers (?q= name search)
//! POST   /suppliers/          - Create supplier
//! DELETE /suppliers/{id}      - Delete supplier (cascades to its shipments)
//!
//! # Shipments
//! GET    /shipments/          - List shipments with totals
//!                               (?store_id=&supplier_id=&date_from=&date_to=)
//! POST   /shipments/          - Create shipment with lines (atomic)
//! GET    /shipments/{id}      - Shipment detail with totals
//! DELETE /shipments/{id}      - Delete shipment and its lines
//! ```
//!
//! All handlers return [`AppError`](crate::error::AppError) on failure, which
//! renders a JSON body with the appropriate status code.

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use serde::Serialize;

use crate::state::AppState;

pub mod products;
pub mod shipments;
pub mod stores;
pub mod suppliers;

/// Build the full application router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(ready))
        .merge(stores::router())
        .merge(products::router())
        .merge(suppliers::router())
        .merge(shipments::router())
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// Liveness check. Always succeeds while the process is up.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Readiness check. Probes the storage backend.
async fn ready(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    match state.store().ping().await {
        Ok(()) => (StatusCode::OK, Json(HealthResponse { status: "ready" })),
        Err(err) => {
            tracing::warn!(error = %err, "readiness probe failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unavailable",
                }),
            )
        }
    }
}
