//! Rules backed by external adapters.
//!
//! Every rule here is flagged external and runs only when the caller enables
//! external validation. A skipped lookup yields no issue; the orchestrator
//! reports the skip once per adapter.

use crate::adapters::{Lookup, TaxpayerStatus, fold_text};
use crate::checksum::{check_cnpj, check_tax_id};
use crate::consistency::check_classification_format;
use crate::core::{FOREIGN, Party, Severity, ValidationIssue};
use crate::engine::{Rule, RuleContext};

use super::{INVOICE, digits, each_item, item_field};

/// The recipient, when it is a domestic party with a valid CNPJ.
fn domestic_company(party: Option<&Party>) -> Option<&Party> {
    party.filter(|p| {
        p.jurisdiction != FOREIGN
            && digits(&p.tax_id).len() == 14
            && check_tax_id(&p.tax_id).is_valid()
    })
}

fn inactive_issue(ctx: &RuleContext<'_>, role: &str, status: &TaxpayerStatus) -> ValidationIssue {
    ctx.issue(
        format!("{role}.tax_id"),
        format!("{role} {} is not active in the taxpayer registry", status.tax_id),
    )
}

fn postal_issues(ctx: &RuleContext<'_>, role: &str, party: &Party) -> Vec<ValidationIssue> {
    let Some(code) = &party.postal_code else {
        return Vec::new();
    };
    let field = format!("{role}.postal_code");
    match ctx.postal(code) {
        Lookup::NotFound => vec![ctx.issue(field, format!("postal code {code} was not found"))],
        Lookup::Skipped(_) => Vec::new(),
        Lookup::Found(info) => {
            let mut issues = Vec::new();
            if info.jurisdiction != party.jurisdiction {
                issues.push(ctx.issue(
                    field,
                    format!(
                        "postal code {code} belongs to {} but the {role} is in {}",
                        info.jurisdiction, party.jurisdiction
                    ),
                ));
            }
            if let Some(municipality) = &party.municipality {
                if fold_text(municipality) != fold_text(&info.municipality) {
                    issues.push(ctx.issue(
                        format!("{role}.municipality"),
                        format!(
                            "postal code {code} belongs to {} \
                             but the declared municipality is {municipality}",
                            info.municipality
                        ),
                    ));
                }
            }
            issues
        }
    }
}

fn name_issues(ctx: &RuleContext<'_>, role: &str, party: &Party) -> Vec<ValidationIssue> {
    let Lookup::Found(status) = ctx.taxpayer(&party.tax_id) else {
        return Vec::new();
    };
    match ctx.similarity(&party.name, &status.name) {
        Lookup::Found(score) if score < ctx.similarity_threshold() => vec![
            ctx.issue(
                format!("{role}.name"),
                format!(
                    "declared name '{}' differs from registered name '{}' (similarity {score:.2})",
                    party.name, status.name
                ),
            )
            .suggest(format!("use the registered name '{}'", status.name)),
        ],
        _ => Vec::new(),
    }
}

pub(super) fn rules() -> Vec<Rule> {
    vec![
        Rule::new(
            "EXT-01",
            Severity::Error,
            "Issuer is active in the taxpayer registry",
            |r, ctx| {
                if !check_cnpj(&r.issuer.tax_id).is_valid() {
                    return Vec::new();
                }
                match ctx.taxpayer(&r.issuer.tax_id) {
                    Lookup::Found(status) if !status.active => {
                        vec![inactive_issue(ctx, "issuer", &status)]
                    }
                    _ => Vec::new(),
                }
            },
        )
        .external(),
        Rule::new(
            "EXT-02",
            Severity::Warning,
            "Recipient is active in the taxpayer registry",
            |r, ctx| {
                let Some(recipient) = domestic_company(r.recipient.as_ref()) else {
                    return Vec::new();
                };
                match ctx.taxpayer(&recipient.tax_id) {
                    Lookup::Found(status) if !status.active => {
                        vec![inactive_issue(ctx, "recipient", &status)]
                    }
                    _ => Vec::new(),
                }
            },
        )
        .external(),
        Rule::new(
            "EXT-03",
            Severity::Error,
            "Issuer jurisdiction matches its registration",
            |r, ctx| {
                if !check_cnpj(&r.issuer.tax_id).is_valid() {
                    return Vec::new();
                }
                match ctx.taxpayer(&r.issuer.tax_id) {
                    Lookup::Found(TaxpayerStatus {
                        jurisdiction: Some(registered),
                        ..
                    }) if registered != r.issuer.jurisdiction => vec![ctx.issue(
                        "issuer.jurisdiction",
                        format!(
                            "issuer is registered in {registered} but declares {}",
                            r.issuer.jurisdiction
                        ),
                    )],
                    _ => Vec::new(),
                }
            },
        )
        .external(),
        Rule::new(
            "EXT-04",
            Severity::Warning,
            "Issuer postal code exists and matches its address",
            |r, ctx| postal_issues(ctx, "issuer", &r.issuer),
        )
        .external(),
        Rule::new(
            "EXT-05",
            Severity::Warning,
            "Recipient postal code exists and matches its address",
            |r, ctx| match &r.recipient {
                Some(p) if p.jurisdiction != FOREIGN => postal_issues(ctx, "recipient", p),
                _ => Vec::new(),
            },
        )
        .external(),
        Rule::new(
            "EXT-06",
            Severity::Error,
            "Classification code exists in the classification table",
            |r, ctx| {
                each_item(r, |i, item| {
                    if !check_classification_format(&item.classification_code).is_pass() {
                        return None;
                    }
                    match ctx.classification(&item.classification_code) {
                        Lookup::NotFound => Some(ctx.issue(
                            item_field(i, "classification_code"),
                            format!(
                                "classification code {} is not in the classification table",
                                item.classification_code
                            ),
                        )),
                        Lookup::Found(_) | Lookup::Skipped(_) => None,
                    }
                })
            },
        )
        .for_categories(INVOICE)
        .item_level()
        .external(),
        Rule::new(
            "EXT-07",
            Severity::Warning,
            "Issuer name resembles its registered name",
            |r, ctx| {
                if !check_cnpj(&r.issuer.tax_id).is_valid() {
                    return Vec::new();
                }
                name_issues(ctx, "issuer", &r.issuer)
            },
        )
        .external(),
        Rule::new(
            "EXT-08",
            Severity::Warning,
            "Recipient name resembles its registered name",
            |r, ctx| match domestic_company(r.recipient.as_ref()) {
                Some(p) => name_issues(ctx, "recipient", p),
                None => Vec::new(),
            },
        )
        .external(),
    ]
}
