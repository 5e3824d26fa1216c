//! Price formatting for the Argentine market.
//!
//! Prices are plain [`Decimal`] values everywhere; this module owns their
//! presentation. The same rendering is used by the cart, the admin tables,
//! and the checkout message, so any change here is user-visible in all
//! three places.

use rust_decimal::{Decimal, RoundingStrategy};

/// Format a price the way the storefront displays it: rounded to whole
/// pesos (half away from zero), thousands grouped with `.`, `$` prefix.
///
/// ```
/// use rust_decimal::Decimal;
/// use terracota_core::format_ars;
///
/// assert_eq!(format_ars(Decimal::from(4000)), "$4.000");
/// ```
#[must_use]
pub fn format_ars(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        return "$0".to_owned();
    }

    let digits = rounded.abs().to_string();
    let count = digits.chars().count();
    let mut grouped = String::with_capacity(count + count / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (count - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    if rounded.is_sign_negative() {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}
