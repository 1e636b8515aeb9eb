//! Shipment handlers.
//!
//! Shipment reads render store, supplier, and product as display names and
//! carry the derived `total_quantity` and `total_sum` aggregates. Writes
//! take raw scalar fields and run them through the domain newtypes so a bad
//! value yields a 422 naming the exact field, down to `items[i].…` paths.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockroom_core::{ProductId, Quantity, ShipmentId, StoreId, SupplierId, UnitPrice};

use crate::error::AppError;
use crate::models::{NewShipment, NewShipmentLine, ShipmentFilter, ShipmentRecord};
use crate::state::AppState;

/// Build the shipments router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/shipments/", get(list).post(create))
        .route("/shipments/{id}", get(detail).delete(remove))
}

/// Query parameters for shipment listing. All filters are optional and
/// combine conjunctively; date bounds are inclusive.
#[derive(Debug, Deserialize)]
pub struct ShipmentQuery {
    pub store_id: Option<i32>,
    pub supplier_id: Option<i32>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}

impl From<ShipmentQuery> for ShipmentFilter {
    fn from(query: ShipmentQuery) -> Self {
        Self {
            store_id: query.store_id.map(StoreId::new),
            supplier_id: query.supplier_id.map(SupplierId::new),
            date_from: query.date_from,
            date_to: query.date_to,
        }
    }
}

/// One line in a shipment response.
#[derive(Debug, Serialize)]
pub struct ShipmentItemOut {
    /// Product display name.
    pub product: String,
    pub quantity: i32,
    /// Serialized as a string, e.g. `"10.50"`.
    pub price_per_unit: Decimal,
}

/// A shipment with display names and derived totals.
#[derive(Debug, Serialize)]
pub struct ShipmentOut {
    pub id: ShipmentId,
    /// Store display name.
    pub store: String,
    /// Supplier display name.
    pub supplier: String,
    pub date: DateTime<Utc>,
    pub total_quantity: i64,
    /// Serialized as a string, e.g. `"24.00"`.
    pub total_sum: Decimal,
    pub items: Vec<ShipmentItemOut>,
}

impl From<ShipmentRecord> for ShipmentOut {
    fn from(record: ShipmentRecord) -> Self {
        let total_quantity = record.total_quantity();
        let total_sum = record.total_sum();
        Self {
            id: record.shipment.id,
            store: record.store_name,
            supplier: record.supplier_name,
            date: record.shipment.date,
            total_quantity,
            total_sum,
            items: record
                .lines
                .into_iter()
                .map(|l| ShipmentItemOut {
                    product: l.product_name,
                    quantity: l.line.quantity.as_i32(),
                    price_per_unit: l.line.price_per_unit.value(),
                })
                .collect(),
        }
    }
}

/// Request body for creating a shipment.
#[derive(Debug, Deserialize)]
pub struct CreateShipmentRequest {
    pub store_id: i32,
    pub supplier_id: i32,
    pub date: DateTime<Utc>,
    pub items: Vec<CreateShipmentItem>,
}

/// One line of a shipment creation request.
#[derive(Debug, Deserialize)]
pub struct CreateShipmentItem {
    pub product_id: i32,
    pub quantity: i32,
    /// Accepted as a JSON string, e.g. `"10.50"`.
    pub price_per_unit: Decimal,
}

impl CreateShipmentRequest {
    fn validate(self) -> Result<NewShipment, AppError> {
        let items = self
            .items
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                let quantity = Quantity::new(item.quantity)
                    .map_err(|e| AppError::validation(format!("items[{i}].quantity"), e.to_string()))?;
                let price_per_unit = UnitPrice::new(item.price_per_unit).map_err(|e| {
                    AppError::validation(format!("items[{i}].price_per_unit"), e.to_string())
                })?;
                Ok(NewShipmentLine {
                    product_id: ProductId::new(item.product_id),
                    quantity,
                    price_per_unit,
                })
            })
            .collect::<Result<Vec<_>, AppError>>()?;

        Ok(NewShipment {
            store_id: StoreId::new(self.store_id),
            supplier_id: SupplierId::new(self.supplier_id),
            date: self.date,
            items,
        })
    }
}

/// Response for shipment creation.
#[derive(Debug, Serialize)]
pub struct CreateShipmentResponse {
    pub success: bool,
    pub shipment_id: ShipmentId,
}

/// List shipments matching the supplied filters, with totals.
///
/// # Errors
///
/// Returns an error if the storage backend fails.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ShipmentQuery>,
) -> Result<Json<Vec<ShipmentOut>>, AppError> {
    let records = state.store().list_shipments(&query.into()).await?;
    Ok(Json(records.into_iter().map(Into::into).collect()))
}

/// Fetch one shipment with totals.
///
/// # Errors
///
/// Returns a 404 if the shipment does not exist.
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ShipmentOut>, AppError> {
    let record = state
        .store()
        .get_shipment(ShipmentId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("shipment {id}")))?;
    Ok(Json(record.into()))
}

/// Create a shipment together with its lines, atomically.
///
/// # Errors
///
/// Returns a 422 if a field fails validation or a referenced store,
/// supplier, or product does not exist.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateShipmentRequest>,
) -> Result<(StatusCode, Json<CreateShipmentResponse>), AppError> {
    let record = state.store().create_shipment(body.validate()?).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateShipmentResponse {
            success: true,
            shipment_id: record.shipment.id,
        }),
    ))
}

/// Delete a shipment and its lines.
///
/// # Errors
///
/// Returns a 404 if the shipment does not exist.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    if state.store().delete_shipment(ShipmentId::new(id)).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("shipment {id}")))
    }
}
