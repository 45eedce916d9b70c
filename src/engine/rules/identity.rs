//! Access key, party identity, and header rules.

use chrono::Datelike;

use crate::checksum::{
    AccessKey, CheckResult, check_access_key, check_cnpj, check_registration, check_tax_id,
};
use crate::core::{
    DocumentCategory, FOREIGN, Severity, is_known_jurisdiction, jurisdiction_for_ibge,
};
use crate::engine::Rule;

use super::{digits, format_issue, mismatch_issue};

pub(super) fn rules() -> Vec<Rule> {
    vec![
        Rule::new(
            "IDN-01",
            Severity::Error,
            "Access key has exactly 44 digits",
            |r, ctx| {
                format_issue(ctx, "access_key", "access key", &check_access_key(&r.access_key))
            },
        ),
        Rule::new(
            "IDN-02",
            Severity::Error,
            "Access key check digit matches",
            |r, ctx| match check_access_key(&r.access_key) {
                CheckResult::Mismatch { expected, found } => vec![
                    ctx.issue(
                        "access_key",
                        format!("access key check digit is {found}, expected {expected}"),
                    )
                    .suggest(format!("recompute the check digit; expected {expected}")),
                ],
                _ => Vec::new(),
            },
        ),
        Rule::new(
            "IDN-03",
            Severity::Error,
            "Access key jurisdiction matches the issuer",
            |r, ctx| {
                let Some(key) = AccessKey::parse(&r.access_key) else {
                    return Vec::new();
                };
                match jurisdiction_for_ibge(&key.jurisdiction_code) {
                    None => vec![ctx.issue(
                        "access_key",
                        format!(
                            "access key jurisdiction code {} is not a known IBGE code",
                            key.jurisdiction_code
                        ),
                    )],
                    Some(uf)
                        if is_known_jurisdiction(&r.issuer.jurisdiction)
                            && uf != r.issuer.jurisdiction =>
                    {
                        vec![ctx.issue(
                            "access_key",
                            format!(
                                "access key was issued in {uf} but the issuer is in {}",
                                r.issuer.jurisdiction
                            ),
                        )]
                    }
                    Some(_) => Vec::new(),
                }
            },
        ),
        Rule::new(
            "IDN-04",
            Severity::Error,
            "Access key embeds the issuer CNPJ",
            |r, ctx| {
                let Some(key) = AccessKey::parse(&r.access_key) else {
                    return Vec::new();
                };
                let issuer = digits(&r.issuer.tax_id);
                if issuer.len() == 14 && key.cnpj != issuer {
                    vec![ctx.issue(
                        "access_key",
                        format!(
                            "access key carries CNPJ {} but the issuer is {issuer}",
                            key.cnpj
                        ),
                    )]
                } else {
                    Vec::new()
                }
            },
        ),
        Rule::new(
            "IDN-05",
            Severity::Error,
            "Access key model matches the document category",
            |r, ctx| {
                let Some(key) = AccessKey::parse(&r.access_key) else {
                    return Vec::new();
                };
                match DocumentCategory::from_model(&key.model) {
                    Err(_) => vec![ctx.issue(
                        "access_key",
                        format!("model {} is not a known fiscal document model", key.model),
                    )],
                    Ok(category) if category != r.category => vec![
                        ctx.issue(
                            "access_key",
                            format!(
                                "model {} denotes a {category} but the record is a {}",
                                key.model, r.category
                            ),
                        )
                        .suggest(format!("expected one of {}", r.category.models().join(", "))),
                    ],
                    Ok(_) => Vec::new(),
                }
            },
        ),
        Rule::new(
            "IDN-06",
            Severity::Warning,
            "Access key year and month match the issue date",
            |r, ctx| {
                let (Some(key), Some(date)) = (AccessKey::parse(&r.access_key), r.issue_date)
                else {
                    return Vec::new();
                };
                let year = date.year().rem_euclid(100) as u32;
                if key.year != year || key.month != date.month() {
                    vec![ctx.issue(
                        "access_key",
                        format!(
                            "access key period {:02}/{:02} differs from issue date {date}",
                            key.month, key.year
                        ),
                    )]
                } else {
                    Vec::new()
                }
            },
        ),
        Rule::new(
            "IDN-07",
            Severity::Error,
            "Issuer CNPJ has 14 digits",
            |r, ctx| {
                format_issue(ctx, "issuer.tax_id", "issuer CNPJ", &check_cnpj(&r.issuer.tax_id))
            },
        ),
        Rule::new(
            "IDN-08",
            Severity::Error,
            "Issuer CNPJ check digits match",
            |r, ctx| {
                mismatch_issue(ctx, "issuer.tax_id", "issuer CNPJ", &check_cnpj(&r.issuer.tax_id))
            },
        ),
        Rule::new(
            "IDN-09",
            Severity::Error,
            "Issuer jurisdiction is a known UF",
            |r, ctx| {
                if is_known_jurisdiction(&r.issuer.jurisdiction) {
                    Vec::new()
                } else {
                    vec![ctx.issue(
                        "issuer.jurisdiction",
                        format!("'{}' is not a known jurisdiction", r.issuer.jurisdiction),
                    )]
                }
            },
        ),
        Rule::new(
            "IDN-10",
            Severity::Error,
            "Issuer state registration is valid for its jurisdiction",
            |r, ctx| {
                let Some(ie) = &r.issuer.state_registration else {
                    return Vec::new();
                };
                if !is_known_jurisdiction(&r.issuer.jurisdiction) {
                    return Vec::new();
                }
                match check_registration(&r.issuer.jurisdiction, ie) {
                    result if result.is_valid() => Vec::new(),
                    result => vec![ctx.issue(
                        "issuer.state_registration",
                        format!("state registration '{ie}': {result}"),
                    )],
                }
            },
        ),
        Rule::new(
            "IDN-11",
            Severity::Error,
            "Recipient tax id is an 11-digit CPF or 14-digit CNPJ",
            |r, ctx| match &r.recipient {
                Some(p) if p.jurisdiction != FOREIGN => format_issue(
                    ctx,
                    "recipient.tax_id",
                    "recipient tax id",
                    &check_tax_id(&p.tax_id),
                ),
                _ => Vec::new(),
            },
        ),
        Rule::new(
            "IDN-12",
            Severity::Error,
            "Recipient tax id check digits match",
            |r, ctx| match &r.recipient {
                Some(p) if p.jurisdiction != FOREIGN => mismatch_issue(
                    ctx,
                    "recipient.tax_id",
                    "recipient tax id",
                    &check_tax_id(&p.tax_id),
                ),
                _ => Vec::new(),
            },
        ),
        Rule::new(
            "IDN-13",
            Severity::Error,
            "Recipient jurisdiction is a known UF or EX",
            |r, ctx| match &r.recipient {
                Some(p) if p.jurisdiction != FOREIGN && !is_known_jurisdiction(&p.jurisdiction) => {
                    vec![ctx.issue(
                        "recipient.jurisdiction",
                        format!("'{}' is not a known jurisdiction", p.jurisdiction),
                    )]
                }
                _ => Vec::new(),
            },
        ),
        Rule::new(
            "IDN-14",
            Severity::Warning,
            "Recipient state registration is valid for its jurisdiction",
            |r, ctx| {
                let Some(p) = &r.recipient else {
                    return Vec::new();
                };
                let Some(ie) = &p.state_registration else {
                    return Vec::new();
                };
                if !is_known_jurisdiction(&p.jurisdiction) {
                    return Vec::new();
                }
                let result = check_registration(&p.jurisdiction, ie);
                if result.is_valid() {
                    Vec::new()
                } else {
                    vec![ctx.issue(
                        "recipient.state_registration",
                        format!("state registration '{ie}': {result}"),
                    )]
                }
            },
        ),
        Rule::new("IDN-15", Severity::Error, "Issuer name is present", |r, ctx| {
            if r.issuer.name.trim().is_empty() {
                vec![ctx.issue("issuer.name", "issuer name is empty")]
            } else {
                Vec::new()
            }
        }),
        Rule::new("IDN-16", Severity::Error, "Document number is non-zero", |r, ctx| {
            if r.number == 0 {
                vec![ctx.issue("number", "document number must be at least 1")]
            } else {
                Vec::new()
            }
        }),
        Rule::new("IDN-17", Severity::Error, "Issue date is present", |r, ctx| {
            if r.issue_date.is_none() {
                vec![ctx.issue("issue_date", "issue date is missing")]
            } else {
                Vec::new()
            }
        }),
    ]
}
