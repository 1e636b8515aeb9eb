//! Shipments and their line items, with derived totals.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockroom_core::{ProductId, Quantity, ShipmentId, ShipmentLineId, StoreId, SupplierId, UnitPrice};

/// A shipment header: one delivery event at a store, from a supplier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Shipment {
    /// Unique shipment ID.
    pub id: ShipmentId,
    /// Receiving store.
    pub store_id: StoreId,
    /// Sending supplier.
    pub supplier_id: SupplierId,
    /// When the shipment arrived.
    pub date: DateTime<Utc>,
}

/// One product entry within a shipment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShipmentLine {
    /// Unique line ID.
    pub id: ShipmentLineId,
    /// Owning shipment; deleting the shipment deletes its lines.
    pub shipment_id: ShipmentId,
    /// Shipped product.
    pub product_id: ProductId,
    /// Units shipped (positive).
    pub quantity: Quantity,
    /// Validated price per unit.
    pub price_per_unit: UnitPrice,
}

/// Input for creating a shipment together with its lines.
///
/// Field values are already validated; building this type is the job of the
/// request-level validation in the routes layer.
#[derive(Debug, Clone)]
pub struct NewShipment {
    /// Receiving store.
    pub store_id: StoreId,
    /// Sending supplier.
    pub supplier_id: SupplierId,
    /// When the shipment arrived.
    pub date: DateTime<Utc>,
    /// Line items; persisted atomically with the header.
    pub items: Vec<NewShipmentLine>,
}

/// Input for a single line of a new shipment.
#[derive(Debug, Clone)]
pub struct NewShipmentLine {
    /// Shipped product.
    pub product_id: ProductId,
    /// Units shipped.
    pub quantity: Quantity,
    /// Price per unit.
    pub price_per_unit: UnitPrice,
}

/// A shipment line joined with its product's display name.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LineRecord {
    /// The line itself.
    pub line: ShipmentLine,
    /// Product display name at read time.
    pub product_name: String,
}

/// A shipment read model: header, display names, and lines.
///
/// Totals are methods, not fields. They are recomputed from the current
/// lines on every call and are never persisted.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ShipmentRecord {
    /// The shipment header.
    pub shipment: Shipment,
    /// Store display name at read time.
    pub store_name: String,
    /// Supplier display name at read time.
    pub supplier_name: String,
    /// Lines with product names, id-ascending.
    pub lines: Vec<LineRecord>,
}

impl ShipmentRecord {
    /// Sum of line quantities; 0 for a shipment with no lines.
    #[must_use]
    pub fn total_quantity(&self) -> i64 {
        self.lines
            .iter()
            .map(|l| l.line.quantity.as_i64())
            .sum()
    }

    /// Sum over lines of quantity × price-per-unit, exact.
    ///
    /// Always reported with two fractional digits.
    #[must_use]
    pub fn total_sum(&self) -> Decimal {
        let mut total: Decimal = self
            .lines
            .iter()
            .map(|l| l.line.price_per_unit.extend(l.line.quantity.as_i64()))
            .sum();
        total.rescale(2);
        total
    }
}

/// Conjunctive filters for shipment listings.
///
/// Omitted filters impose no constraint; date bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShipmentFilter {
    /// Only shipments received by this store.
    pub store_id: Option<StoreId>,
    /// Only shipments sent by this supplier.
    pub supplier_id: Option<SupplierId>,
    /// Inclusive lower bound on the shipment date.
    pub date_from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the shipment date.
    pub date_to: Option<DateTime<Utc>>,
}

impl ShipmentFilter {
    /// Whether a shipment header satisfies every supplied filter.
    #[must_use]
    pub fn matches(&self, shipment: &Shipment) -> bool {
        if self.store_id.is_some_and(|id| shipment.store_id != id) {
            return false;
        }
        if self.supplier_id.is_some_and(|id| shipment.supplier_id != id) {
            return false;
        }
        if self.date_from.is_some_and(|from| shipment.date < from) {
            return false;
        }
        if self.date_to.is_some_and(|to| shipment.date > to) {
            return false;
        }
        true
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use chrono::TimeZone;

    use super::*;

    fn price(s: &str) -> UnitPrice {
        UnitPrice::new(Decimal::from_str(s).unwrap()).unwrap()
    }

    fn qty(n: i32) -> Quantity {
        Quantity::new(n).unwrap()
    }

    fn record(lines: Vec<(i32, &str)>) -> ShipmentRecord {
        let shipment = Shipment {
            id: ShipmentId::new(1),
            store_id: StoreId::new(1),
            supplier_id: SupplierId::new(1),
            date: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        };
        let lines = lines
            .into_iter()
            .enumerate()
            .map(|(i, (quantity, unit_price))| LineRecord {
                line: ShipmentLine {
                    id: ShipmentLineId::new(i32::try_from(i).unwrap() + 1),
                    shipment_id: shipment.id,
                    product_id: ProductId::new(1),
                    quantity: qty(quantity),
                    price_per_unit: price(unit_price),
                },
                product_name: "Widget".to_string(),
            })
            .collect();
        ShipmentRecord {
            shipment,
            store_name: "Main St".to_string(),
            supplier_name: "Acme".to_string(),
            lines,
        }
    }

    #[test]
    fn total_quantity_sums_lines() {
        let record = record(vec![(2, "1.00"), (3, "1.00")]);
        assert_eq!(record.total_quantity(), 5);
    }

    #[test]
    fn total_quantity_of_empty_shipment_is_zero() {
        let record = record(vec![]);
        assert_eq!(record.total_quantity(), 0);
        assert_eq!(record.total_sum(), Decimal::from_str("0.00").unwrap());
    }

    #[test]
    fn total_sum_is_exact_fixed_point() {
        // 2 × 10.50 + 1 × 3.00 = 24.00, exactly
        let record = record(vec![(2, "10.50"), (1, "3.00")]);
        let total = record.total_sum();
        assert_eq!(total, Decimal::from_str("24.00").unwrap());
        assert_eq!(total.to_string(), "24.00");
    }

    #[test]
    fn total_sum_reports_two_fractional_digits() {
        let record = record(vec![(3, "7")]);
        assert_eq!(record.total_sum().to_string(), "21.00");
    }

    #[test]
    fn totals_do_not_mutate_input() {
        let record = record(vec![(2, "10.50")]);
        let before = record.clone();
        let _ = record.total_quantity();
        let _ = record.total_sum();
        assert_eq!(record, before);
    }

    fn header(store: i32, supplier: i32, day: u32) -> Shipment {
        Shipment {
            id: ShipmentId::new(1),
            store_id: StoreId::new(store),
            supplier_id: SupplierId::new(supplier),
            date: Utc.with_ymd_and_hms(2024, 3, day, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(ShipmentFilter::default().matches(&header(1, 1, 5)));
    }

    #[test]
    fn filters_are_conjunctive() {
        let filter = ShipmentFilter {
            store_id: Some(StoreId::new(1)),
            supplier_id: Some(SupplierId::new(2)),
            ..ShipmentFilter::default()
        };
        assert!(filter.matches(&header(1, 2, 5)));
        assert!(!filter.matches(&header(1, 3, 5)));
        assert!(!filter.matches(&header(2, 2, 5)));
    }

    #[test]
    fn date_bounds_are_inclusive() {
        let filter = ShipmentFilter {
            date_from: Some(Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap()),
            date_to: Some(Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap()),
            ..ShipmentFilter::default()
        };
        assert!(filter.matches(&header(1, 1, 5)), "lower boundary included");
        assert!(filter.matches(&header(1, 1, 10)), "upper boundary included");
        assert!(filter.matches(&header(1, 1, 7)));
        assert!(!filter.matches(&header(1, 1, 4)));
        assert!(!filter.matches(&header(1, 1, 11)));
    }
}
