//! Supplier handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
};
use serde::Deserialize;

use stockroom_core::{Email, SupplierId};

use crate::error::AppError;
use crate::models::{NewSupplier, Supplier};
use crate::state::AppState;

use super::stores::ListQuery;

/// Build the suppliers router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/suppliers/", get(list).post(create))
        .route("/suppliers/{id}", delete(remove))
}

/// Request body for creating a supplier.
#[derive(Debug, Deserialize)]
pub struct CreateSupplierRequest {
    pub name: String,
    pub contact_email: String,
}

impl CreateSupplierRequest {
    fn validate(self) -> Result<NewSupplier, AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation("name", "name must not be empty"));
        }
        let contact_email = Email::parse(&self.contact_email)
            .map_err(|e| AppError::validation("contact_email", e.to_string()))?;
        Ok(NewSupplier {
            name: self.name,
            contact_email,
        })
    }
}

/// List suppliers, optionally filtered by a name search.
///
/// # Errors
///
/// Returns an error if the storage backend fails.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Supplier>>, AppError> {
    let suppliers = state.store().list_suppliers(query.q.as_deref()).await?;
    Ok(Json(suppliers))
}

/// Create a supplier.
///
/// # Errors
///
/// Returns a 422 if a field fails validation.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateSupplierRequest>,
) -> Result<(StatusCode, Json<Supplier>), AppError> {
    let supplier = state.store().create_supplier(body.validate()?).await?;
    Ok((StatusCode::CREATED, Json(supplier)))
}

/// Delete a supplier and, by cascade, its shipments.
///
/// # Errors
///
/// Returns a 404 if the supplier does not exist.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    if state.store().delete_supplier(SupplierId::new(id)).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("supplier {id}")))
    }
}
