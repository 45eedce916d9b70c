//! The built-in rule catalogue.
//!
//! | Prefix | Area | Categories |
//! |--------|------|------------|
//! | `IDN-` | access key, parties, header | all |
//! | `ITM-` | line items | invoice |
//! | `TOT-` | monetary totals | invoice, transport service |
//! | `TRN-` | modal, vehicle, route, cargo | transport |
//! | `EXT-` | registry, postal, classification, name checks | all (external) |

mod external;
mod identity;
mod items;
mod totals;
mod transport;

use crate::checksum::CheckResult;
use crate::consistency::Check;
use crate::core::{DocumentCategory, DocumentRecord, LineItem, ValidationIssue};

use super::{Rule, RuleContext};

const INVOICE: [DocumentCategory; 1] = [DocumentCategory::Invoice];
const TRANSPORT: [DocumentCategory; 2] = [
    DocumentCategory::TransportService,
    DocumentCategory::TransportManifest,
];

/// Every built-in rule, in evaluation order.
pub fn default_rules() -> Vec<Rule> {
    let mut rules = identity::rules();
    rules.extend(items::rules());
    rules.extend(totals::rules());
    rules.extend(transport::rules());
    rules.extend(external::rules());
    rules
}

fn item_field(index: usize, name: &str) -> String {
    format!("items[{index}].{name}")
}

/// Apply `check` to every item, collecting the issues it produces.
fn each_item<F>(record: &DocumentRecord, mut check: F) -> Vec<ValidationIssue>
where
    F: FnMut(usize, &LineItem) -> Option<ValidationIssue>,
{
    record
        .items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| check(i, item))
        .collect()
}

/// Turn a failed consistency check into an issue of the current rule.
fn from_check(
    ctx: &RuleContext<'_>,
    field: impl Into<String>,
    check: Check,
) -> Option<ValidationIssue> {
    check.detail().map(|detail| ctx.issue(field, detail))
}

/// Issue for a malformed identifier, if the result is one.
fn format_issue(
    ctx: &RuleContext<'_>,
    field: &str,
    label: &str,
    result: &CheckResult,
) -> Vec<ValidationIssue> {
    match result {
        CheckResult::InvalidFormat(reason) => vec![ctx.issue(field, format!("{label}: {reason}"))],
        CheckResult::Valid | CheckResult::Exempt | CheckResult::Mismatch { .. } => Vec::new(),
    }
}

/// Issue for a check-digit mismatch, if the result is one.
fn mismatch_issue(
    ctx: &RuleContext<'_>,
    field: &str,
    label: &str,
    result: &CheckResult,
) -> Vec<ValidationIssue> {
    match result {
        CheckResult::Mismatch { expected, found } => vec![
            ctx.issue(
                field,
                format!("{label} check digits are {found}, expected {expected}"),
            )
            .suggest("check the identifier for transcription errors"),
        ],
        CheckResult::Valid | CheckResult::Exempt | CheckResult::InvalidFormat(_) => Vec::new(),
    }
}

fn digits(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn codes_are_unique_and_prefixed() {
        let rules = default_rules();
        let codes: HashSet<&str> = rules.iter().map(Rule::code).collect();
        assert_eq!(codes.len(), rules.len());
        for code in codes {
            assert!(
                ["IDN-", "ITM-", "TOT-", "TRN-", "EXT-"]
                    .iter()
                    .any(|p| code.starts_with(p)),
                "{code}"
            );
        }
    }

    #[test]
    fn external_rules_are_flagged() {
        for rule in default_rules() {
            assert_eq!(rule.is_external(), rule.code().starts_with("EXT-"), "{}", rule.code());
        }
    }
}
