//! Cross-field consistency checkers.
//!
//! Each checker is a pure predicate over values taken from one document and
//! returns a [`Check`]. None of them performs I/O; rules in the engine turn a
//! failing [`Check`] into an issue of the appropriate severity.

mod operation;
mod rates;
mod regime;
mod transport;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub use operation::{
    OperationScope, check_operation_direction, check_operation_jurisdiction,
    check_operation_purpose, is_valid_operation_code, operation_direction, operation_scope,
};
pub use rates::{
    INTERSTATE_RATES, MAX_INTRASTATE_RATE, check_interstate_rate, check_intrastate_rate,
};
pub use regime::{
    NORMAL_SITUATION_CODES, SIMPLIFIED_SITUATION_CODES, check_regime_situation,
    check_situation_known, is_untaxed_situation,
};
pub use transport::{
    MANIFEST_MODALS, SERVICE_MODALS, check_cargo_weight, check_carrier_registration,
    check_dangerous_cargo, check_modal, check_route_codes, check_route_repeats,
    check_vehicle_plate, is_valid_plate,
};

/// Tolerance applied to every monetary equality comparison.
pub const AMOUNT_TOLERANCE: Decimal = dec!(0.02);

/// Result of a consistency predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Check {
    Pass,
    /// Suspicious but acceptable; the detail explains why.
    Warn(String),
    /// Inconsistent; the detail explains why.
    Fail(String),
}

impl Check {
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    /// The explanatory detail, if the check did not pass.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Pass => None,
            Self::Warn(d) | Self::Fail(d) => Some(d),
        }
    }
}

/// Whether two amounts agree within [`AMOUNT_TOLERANCE`]. Amounts whose
/// difference overflows are far apart and never match.
pub fn amounts_match(declared: Decimal, computed: Decimal) -> bool {
    declared
        .checked_sub(computed)
        .is_some_and(|difference| difference.abs() <= AMOUNT_TOLERANCE)
}

/// Compare a declared amount against a computed one.
pub fn check_amount(label: &str, declared: Decimal, computed: Decimal) -> Check {
    if amounts_match(declared, computed) {
        Check::Pass
    } else {
        Check::Fail(format!(
            "{label} {declared} differs from computed {computed} by more than {AMOUNT_TOLERANCE}"
        ))
    }
}

/// Compare a declared amount against one that may not have been computable.
pub fn check_computed_amount(label: &str, declared: Decimal, computed: Option<Decimal>) -> Check {
    match computed {
        Some(computed) => check_amount(label, declared, computed),
        None => Check::Fail(format!("{label} cannot be checked: amount out of range")),
    }
}

/// Classification codes (NCM) are exactly eight digits.
pub fn check_classification_format(code: &str) -> Check {
    if code.len() == 8 && code.bytes().all(|b| b.is_ascii_digit()) {
        Check::Pass
    } else {
        Check::Warn(format!(
            "classification code '{code}' must have exactly 8 digits"
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tolerance_boundary() {
        assert!(amounts_match(dec!(100.00), dec!(100.02)));
        assert!(amounts_match(dec!(100.02), dec!(100.00)));
        assert!(!amounts_match(dec!(100.00), dec!(100.03)));
    }

    #[test]
    fn far_apart_extremes_never_match() {
        assert!(!amounts_match(Decimal::MAX, Decimal::MIN));
        assert!(amounts_match(Decimal::MAX, Decimal::MAX));
        assert_eq!(
            check_computed_amount("gross total", dec!(10), None).detail(),
            Some("gross total cannot be checked: amount out of range")
        );
        assert!(check_computed_amount("gross total", dec!(10), Some(dec!(10.01))).is_pass());
    }

    #[test]
    fn amount_check_reports_both_values() {
        let c = check_amount("vProd", dec!(10.00), dec!(10.05));
        assert_eq!(
            c.detail(),
            Some("vProd 10.00 differs from computed 10.05 by more than 0.02")
        );
    }

    #[test]
    fn classification_format() {
        assert!(check_classification_format("07032090").is_pass());
        assert!(!check_classification_format("0703209").is_pass());
        assert!(!check_classification_format("0703209A").is_pass());
        assert!(matches!(check_classification_format(""), Check::Warn(_)));
    }
}
