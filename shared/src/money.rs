//! Money helpers — integer minor currency units (分)
//!
//! All monetary amounts are stored and computed as `i64` minor units.
//! Conversion to a major-unit display string happens only at the response
//! boundary and is never fed back into arithmetic.

/// Maximum quantity accepted for a single order line.
pub const MAX_QUANTITY: i64 = 9999;

/// Line total in minor units. `None` on overflow.
pub fn line_total(price: i64, quantity: i64) -> Option<i64> {
    price.checked_mul(quantity)
}

/// Sum of `(price, quantity)` lines in minor units. `None` on overflow.
pub fn order_total<I>(lines: I) -> Option<i64>
where
    I: IntoIterator<Item = (i64, i64)>,
{
    lines
        .into_iter()
        .try_fold(0i64, |acc, (price, quantity)| {
            acc.checked_add(line_total(price, quantity)?)
        })
}

/// 分 → 元 display string ("1250" → "12.50")
///
/// Pure formatting, display only.
pub fn format_minor_units(amount: i64) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}
