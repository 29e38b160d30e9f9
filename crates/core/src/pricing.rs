//! Lenient price coercion and discount computation.
//!
//! The bookstore API serializes prices inconsistently: sometimes JSON
//! numbers, sometimes numeric strings (`"12.99"`). All wire types coerce
//! through [`coerce_decimal`] via the [`lenient`] serde helpers so the rest
//! of the code only ever sees [`Decimal`] values. Unparsable input is
//! treated as absent (or zero where a value is required), never as an
//! error.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;

/// Coerce a JSON value into a decimal amount.
///
/// Accepts numbers and numeric strings; everything else (including
/// whitespace-only and unparsable strings) yields `None`.
#[must_use]
pub fn coerce_decimal(value: &Value) -> Option<Decimal> {
    match value {
        // Going through the number's string form avoids binary-float
        // artifacts like 12.99 -> 12.989999...
        Value::Number(n) => n.to_string().parse().ok(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Percentage off the original price, when a real markdown exists.
///
/// Returns `Some(round(100 - price/original * 100))` only when the
/// original price is present, positive, and strictly greater than the
/// current price. Everything else - including an equal price - is `None`,
/// which is distinct from a 0% discount.
///
/// Rounds half away from zero, matching how the storefront has always
/// displayed badges.
#[must_use]
pub fn discount_percentage(price: Decimal, original_price: Option<Decimal>) -> Option<u32> {
    let original = original_price?;
    if original <= Decimal::ZERO || original <= price {
        return None;
    }

    let percent = Decimal::ONE_HUNDRED - (price / original * Decimal::ONE_HUNDRED);
    percent
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
}

/// Serde field helpers for lenient price deserialization.
///
/// Pair with `#[serde(default, ...)]` so missing fields fall back cleanly.
pub mod lenient {
    use super::{Decimal, Value, coerce_decimal};
    use serde::{Deserialize, Deserializer};

    /// Deserialize a required amount; unparsable input becomes zero.
    ///
    /// # Errors
    ///
    /// Only fails when the underlying JSON itself is malformed.
    pub fn decimal_or_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(coerce_decimal(&value).unwrap_or_default())
    }

    /// Deserialize an optional amount; unparsable input becomes `None`.
    ///
    /// # Errors
    ///
    /// Only fails when the underlying JSON itself is malformed.
    pub fn optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().and_then(coerce_decimal))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_coerce_number_and_string() {
        assert_eq!(coerce_decimal(&json!(12.99)), Some(dec("12.99")));
        assert_eq!(coerce_decimal(&json!("12.99")), Some(dec("12.99")));
        assert_eq!(coerce_decimal(&json!(" 7 ")), Some(dec("7")));
        assert_eq!(coerce_decimal(&json!(0)), Some(Decimal::ZERO));
    }

    #[test]
    fn test_coerce_rejects_garbage() {
        assert_eq!(coerce_decimal(&json!("free")), None);
        assert_eq!(coerce_decimal(&json!("")), None);
        assert_eq!(coerce_decimal(&json!(null)), None);
        assert_eq!(coerce_decimal(&json!([1])), None);
    }

    #[test]
    fn test_discount_requires_higher_original() {
        assert_eq!(discount_percentage(dec("20"), Some(dec("25"))), Some(20));
        // round(100 - 14.99/19.99*100) = round(25.01...) = 25
        assert_eq!(discount_percentage(dec("14.99"), Some(dec("19.99"))), Some(25));
    }

    #[test]
    fn test_discount_absent_cases() {
        // No discount is distinct from 0% - equal prices yield None.
        assert_eq!(discount_percentage(dec("25"), Some(dec("25"))), None);
        assert_eq!(discount_percentage(dec("25"), Some(dec("20"))), None);
        assert_eq!(discount_percentage(dec("25"), None), None);
        assert_eq!(discount_percentage(dec("25"), Some(Decimal::ZERO)), None);
    }

    #[test]
    fn test_discount_rounds_half_up() {
        // 100 - 75/200*100 = 62.5 -> 63, not banker's 62.
        assert_eq!(discount_percentage(dec("75"), Some(dec("200"))), Some(63));
    }

    #[test]
    fn test_lenient_field_helpers() {
        #[derive(Deserialize)]
        struct Listing {
            #[serde(deserialize_with = "lenient::decimal_or_zero")]
            price: Decimal,
            #[serde(default, deserialize_with = "lenient::optional_decimal")]
            original_price: Option<Decimal>,
        }

        let listing: Listing =
            serde_json::from_value(json!({"price": "9.50", "original_price": 12})).unwrap();
        assert_eq!(listing.price, dec("9.50"));
        assert_eq!(listing.original_price, Some(dec("12")));

        let listing: Listing =
            serde_json::from_value(json!({"price": "n/a", "original_price": "n/a"})).unwrap();
        assert_eq!(listing.price, Decimal::ZERO);
        assert_eq!(listing.original_price, None);

        let listing: Listing = serde_json::from_value(json!({"price": 5})).unwrap();
        assert_eq!(listing.original_price, None);
    }
}
