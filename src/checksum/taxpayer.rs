//! CNPJ and CPF check digits.

use super::{CheckResult, mod11_digit, parse_digits, weighted_sum};

const CNPJ_WEIGHTS_1: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
const CNPJ_WEIGHTS_2: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

const CPF_WEIGHTS_1: [u32; 9] = [10, 9, 8, 7, 6, 5, 4, 3, 2];
const CPF_WEIGHTS_2: [u32; 10] = [11, 10, 9, 8, 7, 6, 5, 4, 3, 2];

/// Compute the two expected CNPJ check digits.
///
/// Accepts either the 12-digit base or a full 14-digit CNPJ (the trailing
/// two digits are ignored). Returns `None` for any other shape.
pub fn cnpj_check_digits(cnpj: &str) -> Option<[u8; 2]> {
    let digits = parse_digits(cnpj)?;
    if digits.len() != 12 && digits.len() != 14 {
        return None;
    }
    let d1 = mod11_digit(weighted_sum(&digits[..12], &CNPJ_WEIGHTS_1));
    let mut base = digits[..12].to_vec();
    base.push(d1);
    let d2 = mod11_digit(weighted_sum(&base, &CNPJ_WEIGHTS_2));
    Some([d1, d2])
}

/// Compute the two expected CPF check digits from a 9- or 11-digit value.
pub fn cpf_check_digits(cpf: &str) -> Option<[u8; 2]> {
    let digits = parse_digits(cpf)?;
    if digits.len() != 9 && digits.len() != 11 {
        return None;
    }
    let d1 = mod11_digit(weighted_sum(&digits[..9], &CPF_WEIGHTS_1));
    let mut base = digits[..9].to_vec();
    base.push(d1);
    let d2 = mod11_digit(weighted_sum(&base, &CPF_WEIGHTS_2));
    Some([d1, d2])
}

/// Verify a 14-digit CNPJ.
pub fn check_cnpj(cnpj: &str) -> CheckResult {
    check_identifier(cnpj, 14, "CNPJ", cnpj_check_digits)
}

/// Verify an 11-digit CPF.
pub fn check_cpf(cpf: &str) -> CheckResult {
    check_identifier(cpf, 11, "CPF", cpf_check_digits)
}

/// Verify a taxpayer id that may be either a CNPJ or a CPF, by length.
pub fn check_tax_id(tax_id: &str) -> CheckResult {
    match tax_id.len() {
        14 => check_cnpj(tax_id),
        11 => check_cpf(tax_id),
        n => CheckResult::invalid(format!("expected 11 (CPF) or 14 (CNPJ) digits, got {n}")),
    }
}

fn check_identifier(
    value: &str,
    len: usize,
    label: &str,
    compute: fn(&str) -> Option<[u8; 2]>,
) -> CheckResult {
    let Some(digits) = parse_digits(value) else {
        return CheckResult::invalid(format!("{label} must contain only digits"));
    };
    if digits.len() != len {
        return CheckResult::invalid(format!(
            "{label} must have {len} digits, got {}",
            digits.len()
        ));
    }
    if digits.iter().all(|&d| d == digits[0]) {
        return CheckResult::invalid(format!("{label} with all digits equal is not issued"));
    }
    match compute(value) {
        Some(expected) => CheckResult::compare(&expected, &digits[len - 2..]),
        None => CheckResult::invalid(format!("{label} could not be parsed")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_valid_cnpj() {
        assert_eq!(cnpj_check_digits("112223330001"), Some([8, 1]));
        assert_eq!(check_cnpj("11222333000181"), CheckResult::Valid);
    }

    #[test]
    fn corrupted_cnpj_is_mismatch() {
        assert!(matches!(
            check_cnpj("11222333000182"),
            CheckResult::Mismatch { .. }
        ));
        assert!(matches!(
            check_cnpj("11222333100181"),
            CheckResult::Mismatch { .. }
        ));
    }

    #[test]
    fn cnpj_shape_errors() {
        assert!(check_cnpj("1122233300018").is_invalid_format());
        assert!(check_cnpj("11.222.333/0001-81").is_invalid_format());
        assert!(check_cnpj("00000000000000").is_invalid_format());
        assert!(check_cnpj("").is_invalid_format());
    }

    #[test]
    fn known_valid_cpf() {
        assert_eq!(cpf_check_digits("529982247"), Some([2, 5]));
        assert_eq!(check_cpf("52998224725"), CheckResult::Valid);
        assert!(!check_cpf("52998224726").is_valid());
        assert!(check_cpf("11111111111").is_invalid_format());
    }

    #[test]
    fn tax_id_dispatches_on_length() {
        assert!(check_tax_id("11222333000181").is_valid());
        assert!(check_tax_id("52998224725").is_valid());
        assert!(check_tax_id("123").is_invalid_format());
    }
}
