//! 44-digit access key (chave de acesso) layout and check digit.

use serde::{Deserialize, Serialize};

use super::{CheckResult, mod11_digit, parse_digits};

const KEY_LEN: usize = 44;

/// Compute the check digit for a 43-digit access key prefix.
///
/// Weights cycle 2..=9 starting from the rightmost digit.
pub fn access_key_check_digit(prefix: &str) -> Option<u8> {
    let digits = parse_digits(prefix)?;
    if digits.len() != KEY_LEN - 1 {
        return None;
    }
    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| u32::from(d) * (2 + (i as u32 % 8)))
        .sum();
    Some(mod11_digit(sum))
}

/// Verify the 44th digit of an access key against the first 43.
pub fn check_access_key(key: &str) -> CheckResult {
    let Some(digits) = parse_digits(key) else {
        return CheckResult::invalid("access key must contain only digits");
    };
    if digits.len() != KEY_LEN {
        return CheckResult::invalid(format!(
            "access key must have {KEY_LEN} digits, got {}",
            digits.len()
        ));
    }
    match access_key_check_digit(&key[..KEY_LEN - 1]) {
        Some(expected) => CheckResult::compare(&[expected], &digits[KEY_LEN - 1..]),
        None => CheckResult::invalid("access key prefix could not be parsed"),
    }
}

/// Build a complete access key from its fields, appending the check digit.
///
/// Numeric fields are zero-padded to their fixed widths. Returns `None` when
/// a field does not fit or is not numeric.
#[allow(clippy::too_many_arguments)]
pub fn compose_access_key(
    jurisdiction_code: &str,
    year_month: &str,
    cnpj: &str,
    model: &str,
    series: u32,
    number: u64,
    emission_type: u8,
    random_code: u32,
) -> Option<String> {
    if series > 999 || number > 999_999_999 || emission_type > 9 || random_code > 99_999_999 {
        return None;
    }
    let prefix = format!(
        "{jurisdiction_code}{year_month}{cnpj}{model}\
         {series:03}{number:09}{emission_type}{random_code:08}"
    );
    let dv = access_key_check_digit(&prefix)?;
    Some(format!("{prefix}{dv}"))
}

/// A structurally valid access key split into its fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessKey {
    /// IBGE code of the issuing jurisdiction (cUF).
    pub jurisdiction_code: String,
    /// Two-digit year of issue (AA).
    pub year: u32,
    /// Month of issue (MM).
    pub month: u32,
    /// Issuer CNPJ.
    pub cnpj: String,
    /// Document model (55, 57, 58, 65, 67).
    pub model: String,
    pub series: u32,
    pub number: u64,
    /// tpEmis.
    pub emission_type: u8,
    /// cNF.
    pub random_code: String,
    /// cDV.
    pub check_digit: u8,
}

impl AccessKey {
    /// Split a 44-digit key into fields. Does not verify the check digit.
    pub fn parse(key: &str) -> Option<Self> {
        let digits = parse_digits(key)?;
        if digits.len() != KEY_LEN {
            return None;
        }
        Some(Self {
            jurisdiction_code: key[0..2].to_string(),
            year: key[2..4].parse().ok()?,
            month: key[4..6].parse().ok()?,
            cnpj: key[6..20].to_string(),
            model: key[20..22].to_string(),
            series: key[22..25].parse().ok()?,
            number: key[25..34].parse().ok()?,
            emission_type: digits[34],
            random_code: key[35..43].to_string(),
            check_digit: digits[43],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "35240611222333000181550010000012341000056786";

    #[test]
    fn compose_then_verify() {
        let key =
            compose_access_key("35", "2406", "11222333000181", "55", 1, 1234, 1, 5678).unwrap();
        assert_eq!(key.len(), 44);
        assert_eq!(check_access_key(&key), CheckResult::Valid);
    }

    #[test]
    fn known_key_is_valid() {
        assert_eq!(check_access_key(KEY), CheckResult::Valid);
    }

    #[test]
    fn corrupted_digit_is_mismatch() {
        let mut bytes = KEY.as_bytes().to_vec();
        bytes[30] = if bytes[30] == b'9' { b'0' } else { bytes[30] + 1 };
        let corrupted = String::from_utf8(bytes).unwrap();
        assert!(matches!(
            check_access_key(&corrupted),
            CheckResult::Mismatch { .. }
        ));
    }

    #[test]
    fn wrong_length_is_invalid_format() {
        assert!(check_access_key(&KEY[..43]).is_invalid_format());
        let spaced = "3524 0611222333000181550010000012341000056781";
        assert!(check_access_key(spaced).is_invalid_format());
        assert_eq!(access_key_check_digit("123"), None);
    }

    #[test]
    fn parse_fields() {
        let key = AccessKey::parse(KEY).unwrap();
        assert_eq!(key.jurisdiction_code, "35");
        assert_eq!(key.year, 24);
        assert_eq!(key.month, 6);
        assert_eq!(key.cnpj, "11222333000181");
        assert_eq!(key.model, "55");
        assert_eq!(key.series, 1);
        assert_eq!(key.number, 1234);
        assert_eq!(key.emission_type, 1);
        assert_eq!(key.random_code, "00005678");
    }

    #[test]
    fn compose_rejects_overflowing_fields() {
        assert!(compose_access_key("35", "2406", "11222333000181", "55", 1000, 1, 1, 1).is_none());
        assert!(compose_access_key("35", "2406", "1122233300018X", "55", 1, 1, 1, 1).is_none());
    }
}
