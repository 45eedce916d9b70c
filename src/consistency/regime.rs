//! Tax regime vs. tax situation code (CST / CSOSN).

use crate::core::TaxRegime;

use super::Check;

/// ICMS situation codes (CST) valid under the normal regime.
pub const NORMAL_SITUATION_CODES: &[&str] = &[
    "00", "02", "10", "15", "20", "30", "40", "41", "50", "51", "53", "60", "61", "70", "90",
];

/// ICMS situation codes (CSOSN) valid under the simplified regime.
pub const SIMPLIFIED_SITUATION_CODES: &[&str] = &[
    "101", "102", "103", "201", "202", "203", "300", "400", "500", "900",
];

/// Situation codes that carry no ICMS of their own.
const UNTAXED: &[&str] = &["40", "41", "50", "102", "103", "300", "400"];

fn numeric(code: &str) -> bool {
    !code.is_empty() && code.bytes().all(|b| b.is_ascii_digit())
}

/// Simplified regimes use the 3-digit code space, the normal regime the
/// 2-digit one.
pub fn check_regime_situation(regime: TaxRegime, code: &str) -> Check {
    let expected = if regime.is_simplified() { 3 } else { 2 };
    if numeric(code) && code.len() == expected {
        return Check::Pass;
    }
    let space = if regime.is_simplified() {
        "3-digit CSOSN"
    } else {
        "2-digit CST"
    };
    Check::Fail(format!(
        "tax situation code '{code}' does not belong to the {space} space \
         required by the {regime} regime"
    ))
}

/// The code must be a member of its code space. Only judged once the
/// shape matches the regime.
pub fn check_situation_known(regime: TaxRegime, code: &str) -> Check {
    if !check_regime_situation(regime, code).is_pass() {
        return Check::Pass;
    }
    let known = if regime.is_simplified() {
        SIMPLIFIED_SITUATION_CODES
    } else {
        NORMAL_SITUATION_CODES
    };
    if known.contains(&code) {
        Check::Pass
    } else {
        Check::Fail(format!("tax situation code '{code}' is not defined"))
    }
}

/// Exempt, non-taxed, suspended and simplified-without-credit situations.
pub fn is_untaxed_situation(code: &str) -> bool {
    UNTAXED.contains(&code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_regime_rejects_csosn() {
        assert!(matches!(
            check_regime_situation(TaxRegime::Normal, "102"),
            Check::Fail(_)
        ));
        assert!(check_regime_situation(TaxRegime::Normal, "00").is_pass());
    }

    #[test]
    fn simplified_regimes_reject_cst() {
        assert!(!check_regime_situation(TaxRegime::Simplified, "00").is_pass());
        assert!(!check_regime_situation(TaxRegime::SimplifiedExcess, "40").is_pass());
        assert!(check_regime_situation(TaxRegime::SimplifiedExcess, "101").is_pass());
    }

    #[test]
    fn membership_only_after_shape() {
        assert!(check_situation_known(TaxRegime::Normal, "00").is_pass());
        assert!(!check_situation_known(TaxRegime::Normal, "99").is_pass());
        assert!(!check_situation_known(TaxRegime::Simplified, "999").is_pass());
        // Shape mismatch is reported by the regime check, not here.
        assert!(check_situation_known(TaxRegime::Normal, "102").is_pass());
    }

    #[test]
    fn untaxed_codes() {
        assert!(is_untaxed_situation("40"));
        assert!(is_untaxed_situation("102"));
        assert!(!is_untaxed_situation("00"));
    }
}
