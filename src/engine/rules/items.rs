//! Line item rules (invoices only).

use std::collections::HashSet;

use rust_decimal::Decimal;

use crate::consistency::{
    AMOUNT_TOLERANCE, Check, amounts_match, check_classification_format, check_computed_amount,
    check_interstate_rate, check_intrastate_rate, check_operation_direction,
    check_operation_jurisdiction, check_operation_purpose, check_regime_situation,
    check_situation_known, is_untaxed_situation, is_valid_operation_code,
};
use crate::core::{
    DocumentRecord, FOREIGN, LineItem, Severity, TaxTriple, ValidationIssue, line_gross,
    line_value,
};
use crate::engine::{Rule, RuleContext};

use super::{INVOICE, each_item, from_check, item_field};

fn item_rule<F>(code: &str, severity: Severity, description: &str, check: F) -> Rule
where
    F: Fn(&DocumentRecord, &RuleContext<'_>) -> Vec<ValidationIssue> + Send + Sync + 'static,
{
    Rule::new(code, severity, description, check)
        .for_categories(INVOICE)
        .item_level()
}

fn taxes(item: &LineItem) -> [(&'static str, Option<TaxTriple>); 4] {
    [
        ("icms", item.icms),
        ("ipi", item.ipi),
        ("pis", item.pis),
        ("cofins", item.cofins),
    ]
}

pub(super) fn rules() -> Vec<Rule> {
    vec![
        item_rule(
            "ITM-01",
            Severity::Warning,
            "Classification code has 8 digits",
            |r, ctx| {
                each_item(r, |i, item| {
                    from_check(
                        ctx,
                        item_field(i, "classification_code"),
                        check_classification_format(&item.classification_code),
                    )
                })
            },
        ),
        item_rule(
            "ITM-02",
            Severity::Error,
            "Operation code has 4 digits and a valid leading digit",
            |r, ctx| {
                each_item(r, |i, item| {
                    (!is_valid_operation_code(&item.operation_code)).then(|| {
                        ctx.issue(
                            item_field(i, "operation_code"),
                            format!(
                                "operation code '{}' must be 4 digits starting with 1-3 or 5-7",
                                item.operation_code
                            ),
                        )
                    })
                })
            },
        ),
        item_rule(
            "ITM-03",
            Severity::Error,
            "Operation code matches the declared purpose",
            |r, ctx| {
                each_item(r, |i, item| {
                    if !is_valid_operation_code(&item.operation_code) {
                        return None;
                    }
                    from_check(
                        ctx,
                        item_field(i, "operation_code"),
                        check_operation_purpose(&item.operation_code, r.purpose),
                    )
                })
            },
        ),
        item_rule(
            "ITM-04",
            Severity::Error,
            "Operation code matches the parties' jurisdictions",
            |r, ctx| {
                let recipient = r.recipient.as_ref().map(|p| p.jurisdiction.as_str());
                each_item(r, |i, item| {
                    if !is_valid_operation_code(&item.operation_code) {
                        return None;
                    }
                    from_check(
                        ctx,
                        item_field(i, "operation_code"),
                        check_operation_jurisdiction(
                            &item.operation_code,
                            &r.issuer.jurisdiction,
                            recipient,
                        ),
                    )
                    .map(|issue| {
                        issue.suggest("use 5xxx within a UF, 6xxx across UFs, 7xxx for exports")
                    })
                })
            },
        ),
        item_rule(
            "ITM-05",
            Severity::Error,
            "Operation code matches the document direction",
            |r, ctx| {
                each_item(r, |i, item| {
                    if !is_valid_operation_code(&item.operation_code) {
                        return None;
                    }
                    from_check(
                        ctx,
                        item_field(i, "operation_code"),
                        check_operation_direction(&item.operation_code, r.direction),
                    )
                })
            },
        ),
        item_rule(
            "ITM-06",
            Severity::Error,
            "Tax situation code belongs to the issuer's regime",
            |r, ctx| {
                let Some(regime) = r.tax_regime else {
                    return Vec::new();
                };
                each_item(r, |i, item| {
                    from_check(
                        ctx,
                        item_field(i, "tax_situation"),
                        check_regime_situation(regime, &item.tax_situation),
                    )
                })
            },
        ),
        item_rule(
            "ITM-07",
            Severity::Error,
            "Tax situation code is defined",
            |r, ctx| {
                let Some(regime) = r.tax_regime else {
                    return Vec::new();
                };
                each_item(r, |i, item| {
                    from_check(
                        ctx,
                        item_field(i, "tax_situation"),
                        check_situation_known(regime, &item.tax_situation),
                    )
                })
            },
        ),
        item_rule("ITM-08", Severity::Error, "Quantity is positive", |r, ctx| {
            each_item(r, |i, item| {
                (item.quantity <= Decimal::ZERO).then(|| {
                    ctx.issue(
                        item_field(i, "quantity"),
                        format!("quantity {} must be positive", item.quantity),
                    )
                })
            })
        }),
        item_rule(
            "ITM-09",
            Severity::Error,
            "Unit price is not negative",
            |r, ctx| {
                each_item(r, |i, item| {
                    item.unit_price.is_sign_negative().then(|| {
                        ctx.issue(
                            item_field(i, "unit_price"),
                            format!("unit price {} is negative", item.unit_price),
                        )
                    })
                })
            },
        ),
        item_rule(
            "ITM-10",
            Severity::Error,
            "Gross total equals quantity times unit price minus discount",
            |r, ctx| {
                each_item(r, |i, item| {
                    let computed = line_gross(item.quantity, item.unit_price, item.discount);
                    from_check(
                        ctx,
                        item_field(i, "gross_total"),
                        check_computed_amount("gross total", item.gross_total, computed),
                    )
                })
            },
        ),
        item_rule(
            "ITM-11",
            Severity::Error,
            "Tax value equals base times rate",
            |r, ctx| {
                let mut issues = Vec::new();
                for (i, item) in r.items.iter().enumerate() {
                    for (name, triple) in taxes(item) {
                        let Some(t) = triple else { continue };
                        let label = format!("{name} value");
                        if let Check::Fail(detail) =
                            check_computed_amount(&label, t.value, t.computed_value())
                        {
                            issues.push(ctx.issue(item_field(i, &format!("{name}.value")), detail));
                        }
                    }
                }
                issues
            },
        ),
        item_rule(
            "ITM-12",
            Severity::Warning,
            "Interstate ICMS rate is a common interstate rate",
            |r, ctx| {
                let Some(recipient) = &r.recipient else {
                    return Vec::new();
                };
                if recipient.jurisdiction == FOREIGN {
                    return Vec::new();
                }
                each_item(r, |i, item| {
                    let icms = item.icms?;
                    from_check(
                        ctx,
                        item_field(i, "icms.rate"),
                        check_interstate_rate(
                            &r.issuer.jurisdiction,
                            &recipient.jurisdiction,
                            icms.rate,
                        ),
                    )
                })
            },
        ),
        item_rule(
            "ITM-13",
            Severity::Warning,
            "Intrastate ICMS rate lies between 0 and 35 percent",
            |r, ctx| {
                let interstate = r
                    .recipient
                    .as_ref()
                    .is_some_and(|p| p.jurisdiction != r.issuer.jurisdiction);
                if interstate {
                    return Vec::new();
                }
                each_item(r, |i, item| {
                    let icms = item.icms?;
                    from_check(ctx, item_field(i, "icms.rate"), check_intrastate_rate(icms.rate))
                })
            },
        ),
        item_rule(
            "ITM-14",
            Severity::Error,
            "Product code is present",
            |r, ctx| {
                each_item(r, |i, item| {
                    item.product_code
                        .trim()
                        .is_empty()
                        .then(|| ctx.issue(item_field(i, "product_code"), "product code is empty"))
                })
            },
        ),
        item_rule(
            "ITM-15",
            Severity::Error,
            "Item numbers are unique and start at 1",
            |r, ctx| {
                let mut seen = HashSet::new();
                each_item(r, |i, item| {
                    if item.number == 0 {
                        Some(ctx.issue(item_field(i, "number"), "item number must be at least 1"))
                    } else if !seen.insert(item.number) {
                        Some(ctx.issue(
                            item_field(i, "number"),
                            format!("item number {} is repeated", item.number),
                        ))
                    } else {
                        None
                    }
                })
            },
        ),
        item_rule(
            "ITM-16",
            Severity::Error,
            "Discount is not negative and does not exceed the item value",
            |r, ctx| {
                each_item(r, |i, item| {
                    if item.discount.is_sign_negative() {
                        return Some(ctx.issue(
                            item_field(i, "discount"),
                            format!("discount {} is negative", item.discount),
                        ));
                    }
                    // an out-of-range item value is reported by ITM-10
                    let value = line_value(item.quantity, item.unit_price)?;
                    let limit = value.checked_add(AMOUNT_TOLERANCE)?;
                    (item.discount > limit).then(|| {
                        ctx.issue(
                            item_field(i, "discount"),
                            format!(
                                "discount {} exceeds item value {}",
                                item.discount,
                                value.round_dp(2)
                            ),
                        )
                    })
                })
            },
        ),
        item_rule(
            "ITM-17",
            Severity::Warning,
            "Untaxed situation codes carry no ICMS",
            |r, ctx| {
                each_item(r, |i, item| {
                    let icms = item.icms?;
                    if is_untaxed_situation(&item.tax_situation)
                        && !amounts_match(icms.value, Decimal::ZERO)
                    {
                        Some(ctx.issue(
                            item_field(i, "icms.value"),
                            format!(
                                "situation {} is untaxed but ICMS of {} is declared",
                                item.tax_situation, icms.value
                            ),
                        ))
                    } else {
                        None
                    }
                })
            },
        ),
    ]
}
