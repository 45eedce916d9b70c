//! Operation code (CFOP) consistency.

use crate::core::{Direction, FOREIGN, OperationPurpose};

use super::Check;

/// Geographic scope encoded by the leading digit of an operation code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationScope {
    /// 1xxx / 5xxx.
    SameJurisdiction,
    /// 2xxx / 6xxx.
    OtherJurisdiction,
    /// 3xxx / 7xxx.
    Foreign,
}

/// Accepted operation codes for a declared purpose: leading digits and
/// inclusive ranges of the trailing three digits.
struct PurposeRule {
    purpose: OperationPurpose,
    leading: &'static [u8],
    suffixes: &'static [(u16, u16)],
}

static PURPOSE_TABLE: &[PurposeRule] = &[
    PurposeRule {
        purpose: OperationPurpose::Purchase,
        leading: &[1, 2, 3],
        suffixes: &[(100, 149), (400, 407), (550, 551), (556, 556)],
    },
    PurposeRule {
        purpose: OperationPurpose::Sale,
        leading: &[5, 6, 7],
        suffixes: &[(100, 149), (400, 405)],
    },
    PurposeRule {
        purpose: OperationPurpose::Transfer,
        leading: &[1, 2, 5, 6],
        suffixes: &[(150, 159), (408, 409), (552, 552), (557, 557)],
    },
    PurposeRule {
        purpose: OperationPurpose::Return,
        leading: &[1, 2, 3, 5, 6, 7],
        suffixes: &[(200, 299), (410, 419), (553, 555)],
    },
];

/// Four digits with a leading digit of 1-3 (entries) or 5-7 (exits).
pub fn is_valid_operation_code(code: &str) -> bool {
    code.len() == 4
        && code.bytes().all(|b| b.is_ascii_digit())
        && matches!(code.as_bytes()[0], b'1'..=b'3' | b'5'..=b'7')
}

fn leading_digit(code: &str) -> Option<u8> {
    if !is_valid_operation_code(code) {
        return None;
    }
    Some(code.as_bytes()[0] - b'0')
}

fn suffix(code: &str) -> Option<u16> {
    code.get(1..4)?.parse().ok()
}

/// Direction implied by the leading digit.
pub fn operation_direction(code: &str) -> Option<Direction> {
    match leading_digit(code)? {
        1..=3 => Some(Direction::Entry),
        _ => Some(Direction::Exit),
    }
}

/// Geographic scope implied by the leading digit.
pub fn operation_scope(code: &str) -> Option<OperationScope> {
    match leading_digit(code)? {
        1 | 5 => Some(OperationScope::SameJurisdiction),
        2 | 6 => Some(OperationScope::OtherJurisdiction),
        _ => Some(OperationScope::Foreign),
    }
}

/// The declared purpose must be compatible with the operation code.
pub fn check_operation_purpose(code: &str, purpose: OperationPurpose) -> Check {
    let (Some(lead), Some(tail)) = (leading_digit(code), suffix(code)) else {
        return Check::Fail(format!("operation code '{code}' is malformed"));
    };
    let Some(rule) = PURPOSE_TABLE.iter().find(|r| r.purpose == purpose) else {
        return Check::Pass;
    };
    if !rule.leading.contains(&lead) {
        return Check::Fail(format!(
            "operation code {code} starts with {lead}, \
             which is not allowed for a {purpose} operation"
        ));
    }
    if !rule
        .suffixes
        .iter()
        .any(|&(low, high)| (low..=high).contains(&tail))
    {
        return Check::Fail(format!(
            "operation code {code} does not denote a {purpose} operation"
        ));
    }
    Check::Pass
}

/// Leading 5 requires both parties in the same jurisdiction, leading 6
/// requires different ones, and leading 7 requires a foreign recipient.
/// Entry codes are not constrained.
pub fn check_operation_jurisdiction(code: &str, issuer: &str, recipient: Option<&str>) -> Check {
    let Some(lead) = leading_digit(code) else {
        return Check::Fail(format!("operation code '{code}' is malformed"));
    };
    let Some(recipient) = recipient else {
        return Check::Pass;
    };
    match lead {
        5 if issuer != recipient => Check::Fail(format!(
            "operation code {code} is intrastate \
             but issuer is in {issuer} and recipient in {recipient}"
        )),
        6 if issuer == recipient => Check::Fail(format!(
            "operation code {code} is interstate but both parties are in {issuer}"
        )),
        6 if recipient == FOREIGN => Check::Fail(format!(
            "operation code {code} is interstate but the recipient is foreign"
        )),
        7 if recipient != FOREIGN => Check::Fail(format!(
            "operation code {code} is an export but the recipient is in {recipient}"
        )),
        _ => Check::Pass,
    }
}

/// Entry codes on exit documents (and vice versa) are inconsistent.
pub fn check_operation_direction(code: &str, direction: Direction) -> Check {
    match operation_direction(code) {
        None => Check::Fail(format!("operation code '{code}' is malformed")),
        Some(d) if d == direction => Check::Pass,
        Some(Direction::Entry) => Check::Fail(format!(
            "operation code {code} denotes an entry but the document is an exit"
        )),
        Some(Direction::Exit) => Check::Fail(format!(
            "operation code {code} denotes an exit but the document is an entry"
        )),
    }
}
