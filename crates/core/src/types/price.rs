//! Fixed-point unit price with write-time validation.
//!
//! Monetary values are `rust_decimal::Decimal`, never floating point, so
//! shipment totals add up exactly. The constructor enforces the field rules
//! that apply to every incoming line item.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when validating a [`UnitPrice`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// More than two digits after the decimal point.
    #[error("too many fractional digits (at most 2 allowed)")]
    TooManyFractionalDigits,
    /// The value is at or above the magnitude bound.
    #[error("value too large (must be less than {bound})", bound = UnitPrice::UPPER_BOUND)]
    TooLarge,
    /// Prices cannot be negative.
    #[error("price must not be negative")]
    Negative,
}

/// A validated price-per-unit.
///
/// ## Constraints
///
/// - Scale: at most 2 fractional digits. The scale of the *written* value is
///   what counts: `10.500` is rejected even though it equals `10.50`.
/// - Magnitude: strictly less than `1_000_000_000` (10^9).
/// - Sign: non-negative.
///
/// The magnitude bound is on the value, not the digit count, so
/// `999999999.99` is a valid price. The database column is sized to hold it.
///
/// ## Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use stockroom_core::UnitPrice;
///
/// assert!(UnitPrice::new(Decimal::new(1050, 2)).is_ok()); // 10.50
/// assert!(UnitPrice::new(Decimal::new(10500, 3)).is_err()); // 10.500
/// assert!(UnitPrice::new(Decimal::from(1_000_000_000)).is_err());
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct UnitPrice(Decimal);

impl UnitPrice {
    /// Exclusive upper bound on the price value.
    pub const UPPER_BOUND: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

    /// Maximum number of fractional digits.
    pub const MAX_SCALE: u32 = 2;

    /// Validate a decimal value as a price-per-unit.
    ///
    /// # Errors
    ///
    /// Returns an error if the value has more than 2 fractional digits, is
    /// negative, or is not strictly below 10^9.
    pub fn new(value: Decimal) -> Result<Self, PriceError> {
        if value.scale() > Self::MAX_SCALE {
            return Err(PriceError::TooManyFractionalDigits);
        }
        if value.is_sign_negative() && !value.is_zero() {
            return Err(PriceError::Negative);
        }
        if value >= Self::UPPER_BOUND {
            return Err(PriceError::TooLarge);
        }
        Ok(Self(value))
    }

    /// The underlying decimal value.
    #[must_use]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// Line total for `quantity` units at this price, exact.
    #[must_use]
    pub fn extend(&self, quantity: i64) -> Decimal {
        self.0 * Decimal::from(quantity)
    }
}

impl fmt::Display for UnitPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<Decimal> for UnitPrice {
    type Error = PriceError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UnitPrice> for Decimal {
    fn from(price: UnitPrice) -> Self {
        price.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for UnitPrice {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for UnitPrice {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let value = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(value))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for UnitPrice {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}
