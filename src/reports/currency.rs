//! French-style amount display.

use rust_decimal::{Decimal, RoundingStrategy};

/// Formats an amount with space-grouped thousands and a comma decimal
/// separator, followed by the currency code. Decimals are shown only when
/// the amount has any, up to two.
pub fn format_amount(value: Decimal, currency_code: &str) -> String {
    let rounded = value
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let text = rounded.abs().to_string();
    let (integer, fraction) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut out = String::with_capacity(text.len() + 8);
    if rounded < Decimal::ZERO {
        out.push('-');
    }
    out.push_str(&group_thousands(integer));
    if let Some(fraction) = fraction {
        out.push(',');
        out.push_str(fraction);
    }
    if !currency_code.is_empty() {
        out.push(' ');
        out.push_str(currency_code);
    }
    out
}

/// Formats a tonnage the same way, with a trailing `t`.
pub fn format_tonnage(value: Decimal) -> String {
    format_amount(value, "t")
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    digits
        .chars()
        .enumerate()
        .fold(String::with_capacity(len + len / 3), |mut acc, (idx, ch)| {
            if idx > 0 && (len - idx) % 3 == 0 {
                acc.push(' ');
            }
            acc.push(ch);
            acc
        })
}
