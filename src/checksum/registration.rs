//! State registration (inscrição estadual) check digits for all 27 UFs.
//!
//! Each jurisdiction is described as data: one or more [`RegistrationScheme`]s
//! selected by length, prefix, a selector digit, or a numeric range, each
//! carrying the [`CheckSpec`]s that verify its check digit(s). Adding or
//! correcting a jurisdiction means editing [`SCHEMES`], not code.

use super::{CheckResult, parse_digits};

/// Literal accepted in place of a registration number by exempt taxpayers.
pub const EXEMPT: &str = "ISENTO";

/// How weighted products are accumulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fold {
    /// Sum of `digit * weight`.
    Products,
    /// Sum of the decimal digits of each product (Luhn style).
    DigitSum,
}

/// How the remainder of `sum % modulus` becomes a check digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemainderRule {
    /// `modulus - r`, and 0 when that is 10 or more.
    Complement,
    /// `11 - r`, minus 10 when that is 10 or more.
    ComplementWrap,
    /// The remainder itself.
    Remainder,
    /// Last decimal digit of the remainder.
    RemainderLastDigit,
}

/// One check digit: where it sits and how it is computed.
#[derive(Debug, Clone, Copy)]
pub struct CheckSpec {
    /// Index of the check digit within the registration number.
    pub position: usize,
    /// Indices of the digits that feed the sum, paired with `weights`.
    pub indices: &'static [usize],
    pub weights: &'static [u32],
    /// Constant added to the weighted sum before reduction.
    pub offset: u32,
    pub modulus: u32,
    pub fold: Fold,
    pub rule: RemainderRule,
}

/// One accepted layout for a jurisdiction.
#[derive(Debug, Clone, Copy)]
pub struct RegistrationScheme {
    /// Total digit count, check digits included.
    pub length: usize,
    /// Accepted leading digits; empty means any.
    pub prefixes: &'static [&'static str],
    /// Digit at `.0` must be one of `.1` for this scheme to apply.
    pub selector: Option<(usize, &'static [u8])>,
    /// Inclusive range of the number formed by the first `length - 1` digits.
    pub base_range: Option<(u64, u64)>,
    pub checks: &'static [CheckSpec],
}

const fn mod11(position: usize, indices: &'static [usize], weights: &'static [u32]) -> CheckSpec {
    CheckSpec {
        position,
        indices,
        weights,
        offset: 0,
        modulus: 11,
        fold: Fold::Products,
        rule: RemainderRule::Complement,
    }
}

const fn scheme(
    length: usize,
    prefixes: &'static [&'static str],
    checks: &'static [CheckSpec],
) -> RegistrationScheme {
    RegistrationScheme {
        length,
        prefixes,
        selector: None,
        base_range: None,
        checks,
    }
}

const I8: &[usize] = &[0, 1, 2, 3, 4, 5, 6, 7];
const I9: &[usize] = &[0, 1, 2, 3, 4, 5, 6, 7, 8];
const I10: &[usize] = &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9];
const I11: &[usize] = &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
const I12: &[usize] = &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11];
const I13: &[usize] = &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];

const W9_2: &[u32] = &[9, 8, 7, 6, 5, 4, 3, 2];

/// Plain nine-digit layout: weights 9..2 over the first eight digits.
const NINE: &[CheckSpec] = &[mod11(8, I8, W9_2)];

/// Thirteen-digit layout shared by AC and DF.
const THIRTEEN: &[CheckSpec] = &[
    mod11(11, I11, &[4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2]),
    mod11(12, I12, &[5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2]),
];

const BA_MOD10: &[u8] = &[0, 1, 2, 3, 4, 5, 8];
const BA_MOD11: &[u8] = &[6, 7, 9];

const fn ba_check(
    position: usize,
    indices: &'static [usize],
    weights: &'static [u32],
    modulus: u32,
) -> CheckSpec {
    CheckSpec {
        position,
        indices,
        weights,
        offset: 0,
        modulus,
        fold: Fold::Products,
        rule: RemainderRule::Complement,
    }
}

const BA_8_MOD10: &[CheckSpec] = &[
    ba_check(7, &[0, 1, 2, 3, 4, 5], &[7, 6, 5, 4, 3, 2], 10),
    ba_check(6, &[0, 1, 2, 3, 4, 5, 7], &[8, 7, 6, 5, 4, 3, 2], 10),
];
const BA_8_MOD11: &[CheckSpec] = &[
    ba_check(7, &[0, 1, 2, 3, 4, 5], &[7, 6, 5, 4, 3, 2], 11),
    ba_check(6, &[0, 1, 2, 3, 4, 5, 7], &[8, 7, 6, 5, 4, 3, 2], 11),
];
const BA_9_MOD10: &[CheckSpec] = &[
    ba_check(8, &[0, 1, 2, 3, 4, 5, 6], &[8, 7, 6, 5, 4, 3, 2], 10),
    ba_check(7, &[0, 1, 2, 3, 4, 5, 6, 8], &[9, 8, 7, 6, 5, 4, 3, 2], 10),
];
const BA_9_MOD11: &[CheckSpec] = &[
    ba_check(8, &[0, 1, 2, 3, 4, 5, 6], &[8, 7, 6, 5, 4, 3, 2], 11),
    ba_check(7, &[0, 1, 2, 3, 4, 5, 6, 8], &[9, 8, 7, 6, 5, 4, 3, 2], 11),
];

const MG: &[CheckSpec] = &[
    // A zero is conceptually inserted after the 3-digit municipality code,
    // which shifts the alternating 1/2 weights by one from index 3 onwards.
    CheckSpec {
        position: 11,
        indices: I11,
        weights: &[1, 2, 1, 1, 2, 1, 2, 1, 2, 1, 2],
        offset: 0,
        modulus: 10,
        fold: Fold::DigitSum,
        rule: RemainderRule::Complement,
    },
    mod11(12, I12, &[3, 2, 11, 10, 9, 8, 7, 6, 5, 4, 3, 2]),
];

const SP: &[CheckSpec] = &[
    CheckSpec {
        position: 8,
        indices: I8,
        weights: &[1, 3, 4, 5, 6, 7, 8, 10],
        offset: 0,
        modulus: 11,
        fold: Fold::Products,
        rule: RemainderRule::RemainderLastDigit,
    },
    CheckSpec {
        position: 11,
        indices: I11,
        weights: &[3, 2, 10, 9, 8, 7, 6, 5, 4, 3, 2],
        offset: 0,
        modulus: 11,
        fold: Fold::Products,
        rule: RemainderRule::RemainderLastDigit,
    },
];

const RO: &[CheckSpec] = &[CheckSpec {
    position: 13,
    indices: I13,
    weights: &[6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2],
    offset: 0,
    modulus: 11,
    fold: Fold::Products,
    rule: RemainderRule::ComplementWrap,
}];

const RR: &[CheckSpec] = &[CheckSpec {
    position: 8,
    indices: I8,
    weights: &[1, 2, 3, 4, 5, 6, 7, 8],
    offset: 0,
    modulus: 9,
    fold: Fold::Products,
    rule: RemainderRule::Remainder,
}];

const AP_LOW: &[CheckSpec] = &[CheckSpec {
    position: 8,
    indices: I8,
    weights: W9_2,
    offset: 5,
    modulus: 11,
    fold: Fold::Products,
    rule: RemainderRule::Complement,
}];

const AP_MID: &[CheckSpec] = &[CheckSpec {
    position: 8,
    indices: I8,
    weights: W9_2,
    offset: 9,
    modulus: 11,
    fold: Fold::Products,
    rule: RemainderRule::ComplementWrap,
}];

const MT: &[CheckSpec] = &[mod11(10, I10, &[3, 2, 9, 8, 7, 6, 5, 4, 3, 2])];

const PE: &[CheckSpec] = &[
    mod11(7, &[0, 1, 2, 3, 4, 5, 6], &[8, 7, 6, 5, 4, 3, 2]),
    mod11(8, I8, W9_2),
];

const PR: &[CheckSpec] = &[
    mod11(8, I8, &[3, 2, 7, 6, 5, 4, 3, 2]),
    mod11(9, I9, &[4, 3, 2, 7, 6, 5, 4, 3, 2]),
];

const RJ: &[CheckSpec] = &[mod11(7, &[0, 1, 2, 3, 4, 5, 6], &[2, 7, 6, 5, 4, 3, 2])];

const RN_TEN: &[CheckSpec] = &[mod11(9, I9, &[10, 9, 8, 7, 6, 5, 4, 3, 2])];

const RS: &[CheckSpec] = &[mod11(9, I9, &[2, 9, 8, 7, 6, 5, 4, 3, 2])];

// Legacy TO layout: digits 3-4 carry a company-type code that is excluded
// from the sum.
const TO_LEGACY: &[CheckSpec] = &[mod11(10, &[0, 1, 4, 5, 6, 7, 8, 9], W9_2)];

/// Jurisdiction → accepted layouts, sorted by UF.
static SCHEMES: &[(&str, &[RegistrationScheme])] = &[
    ("AC", &[scheme(13, &["01"], THIRTEEN)]),
    ("AL", &[scheme(9, &["24"], NINE)]),
    ("AM", &[scheme(9, &[], NINE)]),
    (
        "AP",
        &[
            RegistrationScheme {
                length: 9,
                prefixes: &["03"],
                selector: None,
                base_range: Some((3_000_001, 3_017_000)),
                checks: AP_LOW,
            },
            RegistrationScheme {
                length: 9,
                prefixes: &["03"],
                selector: None,
                base_range: Some((3_017_001, 3_019_022)),
                checks: AP_MID,
            },
            scheme(9, &["03"], NINE),
        ],
    ),
    (
        "BA",
        &[
            RegistrationScheme {
                length: 8,
                prefixes: &[],
                selector: Some((0, BA_MOD10)),
                base_range: None,
                checks: BA_8_MOD10,
            },
            RegistrationScheme {
                length: 8,
                prefixes: &[],
                selector: Some((0, BA_MOD11)),
                base_range: None,
                checks: BA_8_MOD11,
            },
            RegistrationScheme {
                length: 9,
                prefixes: &[],
                selector: Some((1, BA_MOD10)),
                base_range: None,
                checks: BA_9_MOD10,
            },
            RegistrationScheme {
                length: 9,
                prefixes: &[],
                selector: Some((1, BA_MOD11)),
                base_range: None,
                checks: BA_9_MOD11,
            },
        ],
    ),
    ("CE", &[scheme(9, &[], NINE)]),
    ("DF", &[scheme(13, &["07"], THIRTEEN)]),
    ("ES", &[scheme(9, &[], NINE)]),
    ("GO", &[scheme(9, &["10", "11", "15"], NINE)]),
    ("MA", &[scheme(9, &["12"], NINE)]),
    ("MG", &[scheme(13, &[], MG)]),
    ("MS", &[scheme(9, &["28", "50"], NINE)]),
    ("MT", &[scheme(11, &[], MT)]),
    ("PA", &[scheme(9, &["15"], NINE)]),
    ("PB", &[scheme(9, &[], NINE)]),
    ("PE", &[scheme(9, &[], PE)]),
    ("PI", &[scheme(9, &[], NINE)]),
    ("PR", &[scheme(10, &[], PR)]),
    ("RJ", &[scheme(8, &[], RJ)]),
    (
        "RN",
        &[
            scheme(9, &["20"], NINE),
            scheme(10, &["20"], RN_TEN),
        ],
    ),
    ("RO", &[scheme(14, &[], RO)]),
    ("RR", &[scheme(9, &["24"], RR)]),
    ("RS", &[scheme(10, &[], RS)]),
    ("SC", &[scheme(9, &[], NINE)]),
    ("SE", &[scheme(9, &[], NINE)]),
    ("SP", &[scheme(12, &[], SP)]),
    (
        "TO",
        &[
            scheme(9, &[], NINE),
            scheme(11, &[], TO_LEGACY),
        ],
    ),
];

/// Accepted layouts for a jurisdiction, if it is known.
pub fn schemes_for(jurisdiction: &str) -> Option<&'static [RegistrationScheme]> {
    SCHEMES
        .binary_search_by(|(uf, _)| uf.cmp(&jurisdiction))
        .ok()
        .map(|i| SCHEMES[i].1)
}

/// Verify a state registration number for the given jurisdiction.
///
/// Formatting characters (`.`, `-`, `/`, spaces) are ignored and the
/// literal [`EXEMPT`] marker is accepted as-is.
pub fn check_registration(jurisdiction: &str, value: &str) -> CheckResult {
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case(EXEMPT) {
        return CheckResult::Exempt;
    }
    let Some(schemes) = schemes_for(jurisdiction) else {
        return CheckResult::invalid(format!("unknown jurisdiction '{jurisdiction}'"));
    };

    let cleaned: String = trimmed
        .chars()
        .filter(|c| !matches!(c, '.' | '-' | '/' | ' '))
        .collect();
    let Some(digits) = parse_digits(&cleaned) else {
        return CheckResult::invalid("registration number must contain only digits");
    };

    let by_length: Vec<&RegistrationScheme> =
        schemes.iter().filter(|s| s.length == digits.len()).collect();
    if by_length.is_empty() {
        let mut lengths: Vec<usize> = schemes.iter().map(|s| s.length).collect();
        lengths.dedup();
        let lengths: Vec<String> = lengths.iter().map(ToString::to_string).collect();
        return CheckResult::invalid(format!(
            "{jurisdiction} registration must have {} digits, got {}",
            lengths.join(" or "),
            digits.len()
        ));
    }

    let Some(selected) = by_length
        .iter()
        .find(|s| scheme_applies(s, &cleaned, &digits))
    else {
        let prefixes: Vec<&str> = by_length
            .iter()
            .flat_map(|s| s.prefixes.iter().copied())
            .collect();
        return CheckResult::invalid(format!(
            "{jurisdiction} registration must start with {}",
            prefixes.join(", ")
        ));
    };

    let mut expected = Vec::with_capacity(selected.checks.len());
    let mut found = Vec::with_capacity(selected.checks.len());
    for spec in selected.checks {
        expected.push(compute(spec, &digits));
        found.push(digits[spec.position]);
    }
    CheckResult::compare(&expected, &found)
}

fn scheme_applies(scheme: &RegistrationScheme, cleaned: &str, digits: &[u8]) -> bool {
    if !scheme.prefixes.is_empty() && !scheme.prefixes.iter().any(|p| cleaned.starts_with(p)) {
        return false;
    }
    if let Some((index, allowed)) = scheme.selector {
        if !allowed.contains(&digits[index]) {
            return false;
        }
    }
    if let Some((low, high)) = scheme.base_range {
        let base = digits[..digits.len() - 1]
            .iter()
            .fold(0u64, |acc, &d| acc * 10 + u64::from(d));
        if base < low || base > high {
            return false;
        }
    }
    true
}

fn compute(spec: &CheckSpec, digits: &[u8]) -> u8 {
    let sum: u32 = spec
        .indices
        .iter()
        .zip(spec.weights)
        .map(|(&i, &w)| {
            let product = u32::from(digits[i]) * w;
            match spec.fold {
                Fold::Products => product,
                Fold::DigitSum => product / 10 + product % 10,
            }
        })
        .sum::<u32>()
        + spec.offset;
    let r = sum % spec.modulus;
    let digit = match spec.rule {
        RemainderRule::Complement => {
            let d = spec.modulus - r;
            if d >= 10 { 0 } else { d }
        }
        RemainderRule::ComplementWrap => {
            let d = 11 - r;
            if d >= 10 { d - 10 } else { d }
        }
        RemainderRule::Remainder => r,
        RemainderRule::RemainderLastDigit => r % 10,
    };
    digit as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_covers_all_jurisdictions_sorted() {
        assert_eq!(SCHEMES.len(), 27);
        assert!(SCHEMES.windows(2).all(|w| w[0].0 < w[1].0));
        for uf in crate::core::all_jurisdictions() {
            assert!(schemes_for(uf).is_some(), "missing scheme for {uf}");
        }
    }

    #[test]
    fn table_indices_are_in_bounds() {
        for (uf, schemes) in SCHEMES {
            for s in *schemes {
                for c in s.checks {
                    assert!(c.position < s.length, "{uf}");
                    assert_eq!(c.indices.len(), c.weights.len(), "{uf}");
                    assert!(c.indices.iter().all(|&i| i < s.length), "{uf}");
                }
            }
        }
    }

    #[test]
    fn exempt_marker_accepted() {
        assert_eq!(check_registration("SP", "ISENTO"), CheckResult::Exempt);
        assert_eq!(check_registration("RJ", " isento "), CheckResult::Exempt);
    }

    #[test]
    fn sp_known_value() {
        assert_eq!(check_registration("SP", "110.042.490.114"), CheckResult::Valid);
        assert!(matches!(
            check_registration("SP", "110042490115"),
            CheckResult::Mismatch { .. }
        ));
    }

    #[test]
    fn mg_uses_digit_sum() {
        assert_eq!(check_registration("MG", "0623079040081"), CheckResult::Valid);
        assert!(!check_registration("MG", "0623079040091").is_valid());
    }

    #[test]
    fn ba_selects_modulus_by_leading_digit() {
        assert_eq!(check_registration("BA", "12345663"), CheckResult::Valid);
        assert_eq!(check_registration("BA", "100000306"), CheckResult::Valid);
    }

    #[test]
    fn ap_uses_range_offsets() {
        assert_eq!(check_registration("AP", "030123459"), CheckResult::Valid);
        assert_eq!(check_registration("AP", "030170011"), CheckResult::Valid);
        assert_eq!(check_registration("AP", "030500001"), CheckResult::Valid);
    }

    #[test]
    fn wrong_prefix_is_invalid_format() {
        let r = check_registration("GO", "209876547");
        assert!(r.is_invalid_format());
        assert!(r.to_string().contains("10, 11, 15"));
    }

    #[test]
    fn wrong_length_is_invalid_format() {
        let r = check_registration("RJ", "123");
        assert!(r.is_invalid_format());
        assert!(r.to_string().contains("8 digits"));
    }

    #[test]
    fn unknown_jurisdiction() {
        assert!(check_registration("XX", "123456789").is_invalid_format());
    }
}
