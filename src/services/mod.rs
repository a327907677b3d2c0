//! Domain services over the ledger store.

pub mod charges;
pub mod clients;
pub mod expenses;
pub mod products;
pub mod reporting;
pub mod revenues;
pub mod vessels;

use rust_decimal::Decimal;

use crate::errors::ServiceError;

/// Code generated for a client or product created from its name alone:
/// upper-cased, whitespace runs collapsed to `_`.
pub fn code_from_name(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_uppercase)
        .collect::<Vec<_>>()
        .join("_")
}

/// Trims an optional text field, treating blank values as absent.
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Amount and tonnage columns are `DECIMAL(15, 2)`.
const MAX_SCALE: u32 = 2;
const MAX_INTEGER_DIGITS: u32 = 13;

/// Trimmed required name; blank input is refused with `"{label} name is required"`.
pub(crate) fn required_name(label: &str, name: &str) -> Result<String, ServiceError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ServiceError::InvalidInput(format!("{label} name is required")));
    }
    Ok(name.to_string())
}

/// Refuses amounts the store could not hold exactly: negatives, more than two
/// decimal places, or thirteen integer digits and up.
pub(crate) fn ensure_storable_amount(field: &str, amount: Decimal) -> Result<(), ServiceError> {
    if amount < Decimal::ZERO {
        return Err(ServiceError::InvalidInput(format!(
            "{field} must not be negative"
        )));
    }
    if amount.normalize().scale() > MAX_SCALE {
        return Err(ServiceError::InvalidInput(format!(
            "{field} cannot have more than {MAX_SCALE} decimal places"
        )));
    }
    if amount.abs() >= Decimal::from(10_i64.pow(MAX_INTEGER_DIGITS)) {
        return Err(ServiceError::InvalidInput(format!(
            "{field} cannot have more than {MAX_INTEGER_DIGITS} integer digits"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case("Sogeco", "SOGECO")]
    #[case("cotonou  bulk\tterminal", "COTONOU_BULK_TERMINAL")]
    #[case("  riz brisé ", "RIZ_BRISÉ")]
    fn codes_follow_names(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(code_from_name(name), expected);
    }

    #[test]
    fn blank_optional_becomes_none() {
        assert_eq!(normalize_optional(Some("   ".into())), None);
        assert_eq!(normalize_optional(Some(" IMO9 ".into())).as_deref(), Some("IMO9"));
        assert_eq!(normalize_optional(None), None);
    }

    #[rstest]
    #[case(dec!(0))]
    #[case(dec!(12.5))]
    #[case(dec!(1250.50))]
    #[case(dec!(10.500))]
    #[case(dec!(9999999999999.99))]
    fn storable_amounts_pass(#[case] amount: Decimal) {
        assert!(ensure_storable_amount("amount", amount).is_ok());
    }

    #[rstest]
    #[case(dec!(-1), "negative")]
    #[case(dec!(1250.555), "decimal places")]
    #[case(dec!(10000000000000), "integer digits")]
    fn unstorable_amounts_are_rejected(#[case] amount: Decimal, #[case] reason: &str) {
        assert_matches!(
            ensure_storable_amount("amount", amount),
            Err(ServiceError::InvalidInput(msg)) if msg.contains(reason)
        );
    }

    #[test]
    fn names_are_trimmed_and_required() {
        assert_eq!(required_name("Client", "  Sogeco ").unwrap(), "Sogeco");
        assert_matches!(
            required_name("Client", "   "),
            Err(ServiceError::InvalidInput(msg)) if msg == "Client name is required"
        );
    }
}
