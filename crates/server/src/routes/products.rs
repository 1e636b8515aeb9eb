//! Product handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
};
use serde::Deserialize;

use stockroom_core::{ProductId, Sku};

use crate::error::AppError;
use crate::models::{NewProduct, Product};
use crate::state::AppState;

use super::stores::ListQuery;

/// Build the products router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products/", get(list).post(create))
        .route("/products/{id}", delete(remove))
}

/// Request body for creating a product.
///
/// The SKU arrives as a raw string so a malformed value produces a 422
/// naming the field instead of a serde-level 400.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub sku: String,
}

impl CreateProductRequest {
    fn validate(self) -> Result<NewProduct, AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation("name", "name must not be empty"));
        }
        let sku = Sku::parse(&self.sku)
            .map_err(|e| AppError::validation("sku", e.to_string()))?;
        Ok(NewProduct {
            name: self.name,
            sku,
        })
    }
}

/// List products, optionally filtered by a name search.
///
/// # Errors
///
/// Returns an error if the storage backend fails.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Product>>, AppError> {
    let products = state.store().list_products(query.q.as_deref()).await?;
    Ok(Json(products))
}

/// Create a product.
///
/// # Errors
///
/// Returns a 422 if a field fails validation, a 409 if the SKU is taken.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let product = state.store().create_product(body.validate()?).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Delete a product and, by cascade, the shipment lines referencing it.
///
/// # Errors
///
/// Returns a 404 if the product does not exist.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    if state.store().delete_product(ProductId::new(id)).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("product {id}")))
    }
}
