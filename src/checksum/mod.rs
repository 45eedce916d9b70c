//! Check-digit algorithms for Brazilian fiscal identifiers.
//!
//! Every function here is pure and total: malformed input is reported as
//! [`CheckResult::InvalidFormat`] rather than by panicking, so the calling
//! rule decides how severe a bad identifier is.
//!
//! # Example
//!
//! ```
//! use nota::checksum::*;
//!
//! assert!(check_cnpj("11222333000181").is_valid());
//! assert!(!check_cnpj("11222333000182").is_valid());
//! assert!(check_registration("SP", "110042490114").is_valid());
//! assert!(check_registration("SP", "ISENTO").is_valid());
//! ```

mod access_key;
mod registration;
mod taxpayer;

use std::fmt;

pub use access_key::{AccessKey, access_key_check_digit, check_access_key, compose_access_key};
pub use registration::{
    CheckSpec, EXEMPT, Fold, RegistrationScheme, RemainderRule, check_registration, schemes_for,
};
pub use taxpayer::{check_cnpj, check_cpf, check_tax_id, cnpj_check_digits, cpf_check_digits};

/// Outcome of verifying an identifier against its check digit(s).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckResult {
    /// Check digits match.
    Valid,
    /// The value is the literal exemption marker; nothing was computed.
    Exempt,
    /// Shape is right but the check digits disagree.
    Mismatch { expected: String, found: String },
    /// Wrong length, non-numeric characters, or a degenerate value.
    InvalidFormat(String),
}

impl CheckResult {
    /// `true` for [`CheckResult::Valid`] and [`CheckResult::Exempt`].
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid | Self::Exempt)
    }

    pub fn is_invalid_format(&self) -> bool {
        matches!(self, Self::InvalidFormat(_))
    }

    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidFormat(reason.into())
    }

    pub(crate) fn compare(expected: &[u8], found: &[u8]) -> Self {
        if expected == found {
            Self::Valid
        } else {
            Self::Mismatch {
                expected: render(expected),
                found: render(found),
            }
        }
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid => f.write_str("valid"),
            Self::Exempt => f.write_str("exempt"),
            Self::Mismatch { expected, found } => {
                write!(f, "check digit mismatch: expected {expected}, found {found}")
            }
            Self::InvalidFormat(reason) => write!(f, "invalid format: {reason}"),
        }
    }
}

/// Parse an all-digit string into digit values. `None` on any other character.
pub(crate) fn parse_digits(value: &str) -> Option<Vec<u8>> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(value.bytes().map(|b| b - b'0').collect())
}

/// Sum of `digit * weight` over paired positions.
pub(crate) fn weighted_sum(digits: &[u8], weights: &[u32]) -> u32 {
    digits
        .iter()
        .zip(weights)
        .map(|(&d, &w)| u32::from(d) * w)
        .sum()
}

/// The usual mod-11 mapping: remainder below 2 gives 0, otherwise `11 - r`.
pub(crate) fn mod11_digit(sum: u32) -> u8 {
    let r = sum % 11;
    if r < 2 { 0 } else { (11 - r) as u8 }
}

fn render(digits: &[u8]) -> String {
    digits.iter().map(|d| char::from(b'0' + d)).collect()
}
