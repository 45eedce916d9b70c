//! Document total rules.

use rust_decimal::Decimal;

use crate::consistency::{check_amount, check_computed_amount};
use crate::core::{DocumentCategory, DocumentTotals, LineItem, Severity, TaxTriple, checked_sum};
use crate::engine::Rule;

use super::{INVOICE, from_check};

/// A rule comparing a declared total against the sum of an item amount.
fn item_sum_rule(
    code: &'static str,
    description: &'static str,
    field: &'static str,
    declared: fn(&DocumentTotals) -> Decimal,
    amount: fn(&LineItem) -> Decimal,
) -> Rule {
    Rule::new(code, Severity::Error, description, move |r, ctx| {
        let computed = checked_sum(r.items.iter().map(amount));
        from_check(
            ctx,
            format!("totals.{field}"),
            check_computed_amount(field, declared(&r.totals), computed),
        )
        .into_iter()
        .collect()
    })
    .for_categories(INVOICE)
    .item_level()
}

fn tax_value(triple: Option<TaxTriple>) -> Decimal {
    triple.map_or(Decimal::ZERO, |t| t.value)
}

pub(super) fn rules() -> Vec<Rule> {
    vec![
        item_sum_rule(
            "TOT-01",
            "Product total equals the sum of item gross totals",
            "products",
            |t| t.products,
            |i| i.gross_total,
        ),
        item_sum_rule(
            "TOT-02",
            "ICMS base equals the sum of item ICMS bases",
            "icms_base",
            |t| t.icms_base,
            |i| i.icms.map_or(Decimal::ZERO, |t| t.base),
        ),
        item_sum_rule(
            "TOT-03",
            "ICMS total equals the sum of item ICMS values",
            "icms",
            |t| t.icms,
            |i| tax_value(i.icms),
        ),
        item_sum_rule(
            "TOT-04",
            "IPI total equals the sum of item IPI values",
            "ipi",
            |t| t.ipi,
            |i| tax_value(i.ipi),
        ),
        item_sum_rule(
            "TOT-05",
            "PIS total equals the sum of item PIS values",
            "pis",
            |t| t.pis,
            |i| tax_value(i.pis),
        ),
        item_sum_rule(
            "TOT-06",
            "COFINS total equals the sum of item COFINS values",
            "cofins",
            |t| t.cofins,
            |i| tax_value(i.cofins),
        ),
        Rule::new(
            "TOT-07",
            Severity::Error,
            "Document total equals products - discount + freight + insurance + other + IPI",
            |r, ctx| {
                from_check(
                    ctx,
                    "totals.document_total",
                    check_computed_amount(
                        "document total",
                        r.totals.document_total,
                        r.totals.composed_total(),
                    ),
                )
                .into_iter()
                .collect()
            },
        )
        .for_categories(INVOICE),
        Rule::new(
            "TOT-08",
            Severity::Warning,
            "Document total is positive",
            |r, ctx| {
                if r.totals.document_total > Decimal::ZERO {
                    Vec::new()
                } else {
                    vec![ctx.issue(
                        "totals.document_total",
                        format!("document total {} is not positive", r.totals.document_total),
                    )]
                }
            },
        )
        .for_categories(INVOICE),
        Rule::new(
            "TOT-09",
            Severity::Error,
            "Service total is present and equals the amount receivable",
            |r, ctx| {
                match (r.totals.service_total, r.totals.receivable) {
                    (None, _) => {
                        vec![ctx.issue("totals.service_total", "service total is missing")]
                    }
                    (Some(total), Some(receivable)) => from_check(
                        ctx,
                        "totals.receivable",
                        check_amount("amount receivable", receivable, total),
                    )
                    .into_iter()
                    .collect(),
                    (Some(_), None) => Vec::new(),
                }
            },
        )
        .for_categories([DocumentCategory::TransportService]),
        Rule::new(
            "TOT-10",
            Severity::Error,
            "Service ICMS value equals base times rate",
            |r, ctx| {
                let Some(t) = r.totals.service_icms else {
                    return Vec::new();
                };
                from_check(
                    ctx,
                    "totals.service_icms.value",
                    check_computed_amount("service ICMS", t.value, t.computed_value()),
                )
                .into_iter()
                .collect()
            },
        )
        .for_categories([DocumentCategory::TransportService]),
    ]
}
