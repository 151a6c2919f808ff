//! Order money arithmetic.
//!
//! Every amount the service stores is rounded to cents here. An order's
//! stored total must always equal [`sum_line_totals`] over its lines; line
//! mutations keep it there with [`adjust_total`] instead of re-reading every
//! line.
//!
//! Amounts are bounded by [`max_amount`], the largest value a
//! `NUMERIC(10, 2)` column holds. Arithmetic is checked and reports
//! [`AmountError::Overflow`] past that bound.

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Decimal places kept for every stored amount.
pub const MONEY_SCALE: u32 = 2;

/// `99 999 999.99` expressed in cents.
const MAX_AMOUNT_CENTS: i64 = 9_999_999_999;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("quantity must be at least 1, got {0}")]
    Quantity(i32),
    #[error("price must be a positive amount in cents, got {0}")]
    Price(Decimal),
    #[error("stock cannot be negative, got {0}")]
    Stock(i32),
    #[error("amount exceeds {}", max_amount())]
    Overflow,
}

/// Largest storable amount.
pub fn max_amount() -> Decimal {
    Decimal::new(MAX_AMOUNT_CENTS, MONEY_SCALE)
}

/// Round to cents, halves away from zero.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

fn bounded(amount: Decimal) -> Result<Decimal, AmountError> {
    let amount = round_money(amount);
    if amount.abs() > max_amount() {
        return Err(AmountError::Overflow);
    }
    Ok(amount)
}

/// `round(quantity * unit_price, 2)`.
pub fn line_total(quantity: i32, unit_price: Decimal) -> Result<Decimal, AmountError> {
    Decimal::from(quantity)
        .checked_mul(unit_price)
        .ok_or(AmountError::Overflow)
        .and_then(bounded)
}

/// Order total after one line changes from `old_line` to `new_line`.
///
/// Insert is `old_line = 0`, delete is `new_line = 0`.
pub fn adjust_total(
    total: Decimal,
    old_line: Decimal,
    new_line: Decimal,
) -> Result<Decimal, AmountError> {
    new_line
        .checked_sub(old_line)
        .and_then(|delta| total.checked_add(delta))
        .ok_or(AmountError::Overflow)
        .and_then(bounded)
}

/// Total recomputed from scratch.
pub fn sum_line_totals<I>(line_totals: I) -> Result<Decimal, AmountError>
where
    I: IntoIterator<Item = Decimal>,
{
    line_totals
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, line| acc.checked_add(line))
        .ok_or(AmountError::Overflow)
        .and_then(bounded)
}

pub fn check_quantity(quantity: i32) -> Result<(), AmountError> {
    if quantity < 1 {
        return Err(AmountError::Quantity(quantity));
    }
    Ok(())
}

/// Prices are whole cents, strictly positive and storable.
pub fn check_price(price: Decimal) -> Result<(), AmountError> {
    if price <= Decimal::ZERO || price.normalize().scale() > MONEY_SCALE {
        return Err(AmountError::Price(price));
    }
    if price > max_amount() {
        return Err(AmountError::Overflow);
    }
    Ok(())
}

pub fn check_stock(stock: i32) -> Result<(), AmountError> {
    if stock < 0 {
        return Err(AmountError::Stock(stock));
    }
    Ok(())
}
