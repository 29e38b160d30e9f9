//! Cart line items and checkout totals.
//!
//! Totals are computed in exact decimal arithmetic and rounded only at
//! display time. The calculator assumes valid input: quantities are kept
//! `>= 1` by the cart handlers, which refuse decrements below one before
//! calling the backend.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{BookId, CartItemId};

/// Flat shipping fee in cents, charged on any non-empty cart.
const SHIPPING_FEE_CENTS: i64 = 599;

/// Sales tax rate in percent.
const TAX_RATE_PERCENT: i64 = 8;

/// A single cart line: one book at one unit price.
///
/// The calculator reads lines, never mutates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Backend cart-item ID.
    pub id: CartItemId,
    /// The book in this line.
    pub book_id: BookId,
    /// Book title, carried for display.
    pub title: String,
    /// Units of this book; always `>= 1`.
    pub quantity: u32,
    /// Price per unit.
    pub unit_price: Decimal,
}

impl CartLine {
    /// Extended price for this line (`unit_price * quantity`).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Derived checkout amounts. Never stored; recomputed from the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    /// Sum of all line totals.
    pub subtotal: Decimal,
    /// Flat-rate shipping; zero for an empty cart.
    pub shipping: Decimal,
    /// Sales tax on the subtotal.
    pub tax: Decimal,
    /// `subtotal + shipping + tax`.
    pub total: Decimal,
}

impl OrderTotals {
    /// Compute checkout totals for a set of cart lines.
    ///
    /// Shipping is a flat fee whenever the subtotal is positive - the store
    /// ships everything at one rate regardless of weight or destination.
    #[must_use]
    pub fn compute(lines: &[CartLine]) -> Self {
        let subtotal: Decimal = lines.iter().map(CartLine::line_total).sum();
        let shipping = if subtotal > Decimal::ZERO {
            Decimal::new(SHIPPING_FEE_CENTS, 2)
        } else {
            Decimal::ZERO
        };
        let tax = subtotal * Decimal::new(TAX_RATE_PERCENT, 2);

        Self {
            subtotal,
            shipping,
            tax,
            total: subtotal + shipping + tax,
        }
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(lines: &[CartLine]) -> u32 {
        lines.iter().map(|line| line.quantity).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(id: i64, quantity: u32, price: &str) -> CartLine {
        CartLine {
            id: CartItemId::new(id),
            book_id: BookId::new(id),
            title: format!("Book {id}"),
            quantity,
            unit_price: price.parse().unwrap(),
        }
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_empty_cart_is_all_zero() {
        let totals = OrderTotals::compute(&[]);
        assert_eq!(totals.subtotal, Decimal::ZERO);
        assert_eq!(totals.shipping, Decimal::ZERO);
        assert_eq!(totals.tax, Decimal::ZERO);
        assert_eq!(totals.total, Decimal::ZERO);
    }

    #[test]
    fn test_totals_flat_shipping_and_tax() {
        let totals = OrderTotals::compute(&[line(1, 2, "10"), line(2, 1, "5")]);
        assert_eq!(totals.subtotal, dec("25"));
        assert_eq!(totals.shipping, dec("5.99"));
        assert_eq!(totals.tax, dec("2.00"));
        assert_eq!(totals.total, dec("32.99"));
    }

    #[test]
    fn test_tax_is_exact_decimal() {
        // 19.99 * 0.08 has four decimal places; the calculator keeps them
        // and display formatting rounds later.
        let totals = OrderTotals::compute(&[line(1, 1, "19.99")]);
        assert_eq!(totals.tax, dec("1.5992"));
        assert_eq!(totals.total, dec("27.5792"));
    }

    #[test]
    fn test_line_total_multiplies_quantity() {
        assert_eq!(line(1, 3, "12.50").line_total(), dec("37.50"));
    }

    #[test]
    fn test_item_count_sums_quantities() {
        let lines = [line(1, 2, "10"), line(2, 5, "1")];
        assert_eq!(OrderTotals::item_count(&lines), 7);
    }
}
