//! Store handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
};
use serde::Deserialize;

use stockroom_core::StoreId;

use crate::error::AppError;
use crate::models::{NewStore, Store};
use crate::state::AppState;

/// Build the stores router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stores/", get(list).post(create))
        .route("/stores/{id}", delete(remove))
}

/// Query parameters for store listing.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Case-insensitive substring match on the store name.
    pub q: Option<String>,
}

/// Request body for creating a store.
#[derive(Debug, Deserialize)]
pub struct CreateStoreRequest {
    pub name: String,
    pub address: String,
}

impl CreateStoreRequest {
    fn validate(self) -> Result<NewStore, AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation("name", "name must not be empty"));
        }
        Ok(NewStore {
            name: self.name,
            address: self.address,
        })
    }
}

/// List stores, optionally filtered by a name search.
///
/// # Errors
///
/// Returns an error if the storage backend fails.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Store>>, AppError> {
    let stores = state.store().list_stores(query.q.as_deref()).await?;
    Ok(Json(stores))
}

/// Create a store.
///
/// # Errors
///
/// Returns a 422 if the name is empty.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateStoreRequest>,
) -> Result<(StatusCode, Json<Store>), AppError> {
    let store = state.store().create_store(body.validate()?).await?;
    Ok((StatusCode::CREATED, Json(store)))
}

/// Delete a store and, by cascade, its shipments.
///
/// # Errors
///
/// Returns a 404 if the store does not exist.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    if state.store().delete_store(StoreId::new(id)).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("store {id}")))
    }
}
