//! Currency display formatting.

use rust_decimal::{Decimal, RoundingStrategy};

/// Format an amount as USD for display (`$1,234.56`).
///
/// `None` renders as `"-"`, the storefront's placeholder for missing
/// amounts. Rounds half away from zero to two decimals; negative amounts
/// carry a leading minus (`-$5.00`).
#[must_use]
pub fn format_currency(amount: Option<Decimal>) -> String {
    let Some(amount) = amount else {
        return "-".to_owned();
    };

    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded < Decimal::ZERO;
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    let grouped = group_thousands(int_part);

    if negative {
        format!("-${grouped}.{frac_part}")
    } else {
        format!("${grouped}.{frac_part}")
    }
}

/// Insert thousands separators into a digit string.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::pricing::coerce_decimal;
    use serde_json::json;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_missing_amount_is_dash() {
        assert_eq!(format_currency(None), "-");
        // Unparsable wire input coerces to None and formats as "-".
        assert_eq!(format_currency(coerce_decimal(&json!("oops"))), "-");
    }

    #[test]
    fn test_string_amount_round_trips() {
        assert_eq!(format_currency(coerce_decimal(&json!("12.5"))), "$12.50");
    }

    #[test]
    fn test_two_decimal_places() {
        assert_eq!(format_currency(Some(dec("5"))), "$5.00");
        assert_eq!(format_currency(Some(dec("5.999"))), "$6.00");
        assert_eq!(format_currency(Some(dec("0"))), "$0.00");
    }

    #[test]
    fn test_thousands_grouping() {
        assert_eq!(format_currency(Some(dec("1234.56"))), "$1,234.56");
        assert_eq!(format_currency(Some(dec("1234567.8"))), "$1,234,567.80");
        assert_eq!(format_currency(Some(dec("999.99"))), "$999.99");
    }

    #[test]
    fn test_negative_amounts() {
        assert_eq!(format_currency(Some(dec("-5"))), "-$5.00");
    }
}
