//! Money calculation using rust_decimal for precision
//!
//! All monetary arithmetic runs on `Decimal`; the database stores
//! integer cents. Floating point never touches a price.


use rust_decimal::Decimal;
use rust_decimal::prelude::*;

/// Rounding: 2 decimal places, half-up
pub const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed unit price (1,000,000.00)
pub const MAX_PRICE_CENTS: i64 = 100_000_000;

/// Maximum allowed quantity per line item
pub const MAX_QUANTITY: i64 = 9999;

/// Pricing errors — converted to validation errors at the boundary
#[derive(Debug, thiserror::Error)]
pub enum PricingError {
    #[error("price must be non-negative, got {0}")]
    NegativePrice(Decimal),

    #[error("price exceeds maximum allowed, got {0}")]
    PriceTooLarge(Decimal),

    #[error("quantity must be between 1 and {MAX_QUANTITY}, got {0}")]
    InvalidQuantity(i64),

    #[error("amount out of representable range")]
    AmountOutOfRange,
}

/// Round a monetary value to 2 decimal places, half-up
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Validate a unit price: finite by construction, bounded, non-negative
pub fn validate_unit_price(price: Decimal) -> Result<(), PricingError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(PricingError::NegativePrice(price));
    }
    if to_cents(price)? > MAX_PRICE_CENTS {
        return Err(PricingError::PriceTooLarge(price));
    }
    Ok(())
}

/// Validate a line item quantity
pub fn validate_quantity(quantity: i64) -> Result<(), PricingError> {
    if !(1..=MAX_QUANTITY).contains(&quantity) {
        return Err(PricingError::InvalidQuantity(quantity));
    }
    Ok(())
}

/// Resolve the unit price for a line item: explicit override wins
/// (discounts), otherwise the catalog price is snapshotted.
pub fn resolve_unit_price(override_price: Option<Decimal>, catalog_price: Decimal) -> Decimal {
    round_money(override_price.unwrap_or(catalog_price))
}

/// Line total: quantity × unit price, rounded
pub fn line_total(quantity: i64, unit_price: Decimal) -> Decimal {
    round_money(Decimal::from(quantity) * unit_price)
}

/// Order total: sum of line totals
pub fn order_total<'a>(line_totals: impl IntoIterator<Item = &'a Decimal>) -> Decimal {
    round_money(line_totals.into_iter().copied().sum())
}

/// Convert a decimal amount to integer cents for storage
pub fn to_cents(value: Decimal) -> Result<i64, PricingError> {
    (round_money(value) * Decimal::ONE_HUNDRED)
        .to_i64()
        .ok_or(PricingError::AmountOutOfRange)
}

/// Convert stored cents back to a decimal amount
pub fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, DECIMAL_PLACES)
}
