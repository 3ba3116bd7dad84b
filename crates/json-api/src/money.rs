//! Money formatting.

use rusty_money::{Money, iso::Currency};

/// Render a minor-unit amount, e.g. `255000` USD as `$2,550.00`.
pub(crate) fn format_minor(amount: i64, currency: &'static Currency) -> String {
    Money::from_minor(amount, currency).to_string()
}
