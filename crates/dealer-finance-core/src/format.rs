//! Rupee display formatting and lenient amount parsing.
//!
//! Display follows the en-IN currency convention: lakh/crore digit grouping,
//! no decimal places and a leading rupee sign. Rounding happens here and only
//! here, so intermediate figures keep full precision until they are shown.

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

use crate::types::Money;

pub const RUPEE_SIGN: &str = "₹";

/// Round to whole rupees, half away from zero.
pub fn round_display(amount: Money) -> Money {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Group a string of integer digits the Indian way: the last three digits,
/// then pairs (`1234567` -> `12,34,567`). Anything that is not an ASCII digit
/// is dropped first.
pub fn group_indian(digits: &str) -> String {
    let digits: String = digits.chars().filter(char::is_ascii_digit).collect();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 2 {
        groups.push(&head[end - 2..end]);
        end -= 2;
    }
    groups.push(&head[..end]);
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

/// Format an amount as whole rupees with en-IN grouping, e.g. `₹12,34,567`.
///
/// Negative amounts display as `₹0`.
pub fn format_inr(amount: Money) -> String {
    let rounded = round_display(amount.max(Decimal::ZERO));
    let digits = rounded.trunc().normalize().to_string();
    format!("{RUPEE_SIGN}{}", group_indian(&digits))
}

/// Parse a loosely formatted amount such as `"₹ 85,000"`.
///
/// Every character outside `[0-9.]` is dropped before parsing; anything that
/// still fails to parse yields zero.
pub fn parse_amount(text: &str) -> Money {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let cleaned = cleaned.strip_suffix('.').unwrap_or(&cleaned);

    if cleaned.is_empty() {
        return Decimal::ZERO;
    }

    Decimal::from_str(cleaned).unwrap_or(Decimal::ZERO)
}
