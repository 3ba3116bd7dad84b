//! Cart recalculation.
//!
//! Pure functions deriving cart totals from cart lines. Amounts are integer
//! minor units; the only rounding happens per line, half away from zero, after
//! applying the line's percentage discount.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use thiserror::Error;
use tracing::warn;

use crate::domain::{
    carts::models::{CartLine, CartTotals},
    products::models::ProductUuid,
};

/// Errors raised while recalculating a cart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    /// A product carried a negative unit price.
    #[error("invalid price {price} for product {product}")]
    InvalidPrice { product: ProductUuid, price: i64 },

    /// A line carried a zero quantity.
    #[error("invalid quantity for product {product}")]
    InvalidQuantity { product: ProductUuid },

    /// An amount did not fit in 64 bits.
    #[error("amount overflow for product {product}")]
    Overflow { product: ProductUuid },

    /// The derived totals break the cart invariants.
    #[error("inconsistent totals: subtotal {subtotal}, total {total}")]
    Inconsistent { subtotal: i64, total: i64 },
}

/// Undiscounted and discounted amount of a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineAmounts {
    pub subtotal: i64,
    pub total: i64,
}

/// Derive the totals for `lines`.
///
/// # Errors
///
/// Returns a [`PricingError`] for a negative price, a zero quantity, an
/// overflowing amount, or totals that violate `0 <= total <= subtotal`.
pub fn recalculate(lines: &[CartLine]) -> Result<CartTotals, PricingError> {
    let mut subtotal: i64 = 0;
    let mut total: i64 = 0;

    for line in lines {
        let amounts = line_amounts(line)?;
        let product = line.product.uuid;

        subtotal = subtotal
            .checked_add(amounts.subtotal)
            .ok_or(PricingError::Overflow { product })?;

        total = total
            .checked_add(amounts.total)
            .ok_or(PricingError::Overflow { product })?;
    }

    let total_saved = subtotal - total;

    if subtotal < 0 || total < 0 || total > subtotal || total_saved < 0 {
        return Err(PricingError::Inconsistent { subtotal, total });
    }

    let unique_item_count =
        u32::try_from(lines.len()).map_err(|_overflow| PricingError::Inconsistent {
            subtotal,
            total,
        })?;

    Ok(CartTotals {
        subtotal,
        total,
        unique_item_count,
        total_saved,
    })
}

/// Amounts for one line, validating its price and quantity.
///
/// # Errors
///
/// Returns a [`PricingError`] for a negative price, a zero quantity or an
/// overflowing amount.
pub fn line_amounts(line: &CartLine) -> Result<LineAmounts, PricingError> {
    let product = line.product.uuid;
    let price = line.product.price;

    if price < 0 {
        return Err(PricingError::InvalidPrice { product, price });
    }

    if line.quantity == 0 {
        return Err(PricingError::InvalidQuantity { product });
    }

    let subtotal = price
        .checked_mul(i64::from(line.quantity))
        .ok_or(PricingError::Overflow { product })?;

    let discount = effective_discount(product, line.product.discount);

    let total = apply_discount(subtotal, discount).ok_or(PricingError::Overflow { product })?;

    Ok(LineAmounts { subtotal, total })
}

/// Clamp a discount percentage into `0..=100`.
pub fn effective_discount(product: ProductUuid, discount: i32) -> i32 {
    let clamped = discount.clamp(0, 100);

    if clamped != discount {
        warn!(product_uuid = %product, discount, clamped, "discount out of range, clamping");
    }

    clamped
}

fn apply_discount(amount: i64, discount: i32) -> Option<i64> {
    let remaining = Decimal::from(100 - discount);

    Decimal::from(amount)
        .checked_mul(remaining)?
        .checked_div(Decimal::ONE_HUNDRED)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::helpers::line_product;

    use super::*;

    fn line(price: i64, discount: i32, quantity: u32) -> CartLine {
        CartLine {
            product: line_product(price, discount, 100),
            quantity,
        }
    }

    #[test]
    fn empty_cart_is_all_zero() -> TestResult {
        let totals = recalculate(&[])?;

        assert_eq!(totals, CartTotals::default());

        Ok(())
    }

    #[test]
    fn whole_discount_needs_no_rounding() -> TestResult {
        let totals = recalculate(&[line(1_000, 15, 3)])?;

        assert_eq!(totals.subtotal, 3_000);
        assert_eq!(totals.total, 2_550);
        assert_eq!(totals.total_saved, 450);
        assert_eq!(totals.unique_item_count, 1);

        Ok(())
    }

    #[test]
    fn fractional_amount_rounds_to_nearest() -> TestResult {
        let totals = recalculate(&[line(999, 10, 1)])?;

        assert_eq!(totals.subtotal, 999);
        assert_eq!(totals.total, 899);
        assert_eq!(totals.total_saved, 100);

        Ok(())
    }

    #[test]
    fn midpoint_rounds_away_from_zero() -> TestResult {
        let amounts = line_amounts(&line(5, 50, 1))?;

        assert_eq!(amounts.total, 3);

        Ok(())
    }

    #[test]
    fn rounding_is_applied_per_line() -> TestResult {
        let totals = recalculate(&[line(5, 50, 1), line(5, 50, 1)])?;

        // 2.5 + 2.5 rounded per line, not 5.0 on the aggregate
        assert_eq!(totals.total, 6);
        assert_eq!(totals.subtotal, 10);

        Ok(())
    }

    #[test]
    fn unique_item_count_ignores_quantities() -> TestResult {
        let totals = recalculate(&[line(100, 0, 4), line(200, 0, 7)])?;

        assert_eq!(totals.unique_item_count, 2);
        assert_eq!(totals.subtotal, 1_800);

        Ok(())
    }

    #[test]
    fn negative_price_is_rejected() {
        let result = recalculate(&[line(-1, 0, 1)]);

        assert!(
            matches!(result, Err(PricingError::InvalidPrice { price: -1, .. })),
            "expected InvalidPrice, got {result:?}"
        );
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let result = recalculate(&[line(100, 0, 0)]);

        assert!(
            matches!(result, Err(PricingError::InvalidQuantity { .. })),
            "expected InvalidQuantity, got {result:?}"
        );
    }

    #[test]
    fn out_of_range_discounts_are_clamped() -> TestResult {
        let over = recalculate(&[line(1_000, 150, 1)])?;
        let under = recalculate(&[line(1_000, -20, 1)])?;

        assert_eq!(over.total, 0);
        assert_eq!(over.total_saved, 1_000);
        assert_eq!(under.total, 1_000);
        assert_eq!(under.total_saved, 0);

        Ok(())
    }

    #[test]
    fn overflowing_amounts_are_rejected() {
        let result = recalculate(&[line(i64::MAX, 0, 2)]);

        assert!(
            matches!(result, Err(PricingError::Overflow { .. })),
            "expected Overflow, got {result:?}"
        );
    }

    #[test]
    fn totals_stay_within_bounds_for_valid_lines() -> TestResult {
        for price in [0, 1, 3, 99, 999, 1_000, 12_345] {
            for discount in [0, 1, 15, 33, 50, 99, 100] {
                for quantity in [1, 2, 3, 7] {
                    let lines = [line(price, discount, quantity), line(price + 1, 0, 1)];
                    let totals = recalculate(&lines)?;

                    assert!(totals.total <= totals.subtotal, "total above subtotal");
                    assert!(totals.total >= 0, "negative total");
                    assert_eq!(totals.total_saved, totals.subtotal - totals.total);
                }
            }
        }

        Ok(())
    }
}
