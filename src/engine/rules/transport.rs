//! Transport rules for CT-e and MDF-e documents.

use crate::consistency::{
    check_cargo_weight, check_carrier_registration, check_dangerous_cargo, check_modal,
    check_route_codes, check_route_repeats, check_vehicle_plate,
};
use crate::core::{
    DocumentCategory, DocumentRecord, Severity, TransportInfo, ValidationIssue,
    is_known_jurisdiction,
};
use crate::engine::{Rule, RuleContext};

use super::{TRANSPORT, from_check};

const ROAD: &str = "01";

/// A rule over the transport block; records without one are left to TRN-01.
fn transport_rule<F>(
    code: &str,
    severity: Severity,
    description: &str,
    categories: &[DocumentCategory],
    check: F,
) -> Rule
where
    F: Fn(&DocumentRecord, &TransportInfo, &RuleContext<'_>) -> Vec<ValidationIssue>
        + Send
        + Sync
        + 'static,
{
    Rule::new(code, severity, description, move |r, ctx| match &r.transport {
        Some(info) => check(r, info, ctx),
        None => Vec::new(),
    })
    .for_categories(categories.iter().copied())
}

fn is_road(info: &TransportInfo) -> bool {
    info.modal.as_deref() == Some(ROAD)
}

const MANIFEST: [DocumentCategory; 1] = [DocumentCategory::TransportManifest];

pub(super) fn rules() -> Vec<Rule> {
    vec![
        Rule::new(
            "TRN-01",
            Severity::Error,
            "Transport documents carry transport attributes",
            |r, ctx| {
                if r.transport.is_none() {
                    vec![ctx.issue("transport", "transport attributes are missing")]
                } else {
                    Vec::new()
                }
            },
        )
        .for_categories(TRANSPORT),
        transport_rule(
            "TRN-02",
            Severity::Error,
            "Modal code is valid for the category",
            &TRANSPORT,
            |r, t, ctx| {
                from_check(ctx, "transport.modal", check_modal(r.category, t.modal.as_deref()))
                    .into_iter()
                    .collect()
            },
        ),
        transport_rule(
            "TRN-03",
            Severity::Error,
            "Carrier registration (RNTRC) has 8 digits",
            &TRANSPORT,
            |_, t, ctx| {
                from_check(
                    ctx,
                    "transport.carrier_registration",
                    check_carrier_registration(t.carrier_registration.as_deref()),
                )
                .into_iter()
                .collect()
            },
        ),
        transport_rule(
            "TRN-04",
            Severity::Error,
            "Vehicle plate uses the legacy or Mercosul format",
            &TRANSPORT,
            |_, t, ctx| {
                from_check(
                    ctx,
                    "transport.vehicle_plate",
                    check_vehicle_plate(t.vehicle_plate.as_deref()),
                )
                .into_iter()
                .collect()
            },
        ),
        transport_rule(
            "TRN-05",
            Severity::Error,
            "Road transport declares a vehicle plate",
            &TRANSPORT,
            |_, t, ctx| {
                if is_road(t) && t.vehicle_plate.is_none() {
                    vec![ctx.issue(
                        "transport.vehicle_plate",
                        "road transport requires a vehicle plate",
                    )]
                } else {
                    Vec::new()
                }
            },
        ),
        transport_rule(
            "TRN-06",
            Severity::Warning,
            "Road transport declares the carrier registration",
            &TRANSPORT,
            |_, t, ctx| {
                if is_road(t) && t.carrier_registration.is_none() {
                    vec![ctx.issue(
                        "transport.carrier_registration",
                        "road transport should declare the carrier registration (RNTRC)",
                    )]
                } else {
                    Vec::new()
                }
            },
        ),
        transport_rule(
            "TRN-07",
            Severity::Error,
            "Manifest route is not empty",
            &MANIFEST,
            |_, t, ctx| {
                if t.route.is_empty() {
                    vec![ctx.issue("transport.route", "manifest route is empty")]
                } else {
                    Vec::new()
                }
            },
        ),
        transport_rule(
            "TRN-08",
            Severity::Error,
            "Route jurisdictions are known UFs",
            &TRANSPORT,
            |_, t, ctx| {
                from_check(ctx, "transport.route", check_route_codes(&t.route))
                    .into_iter()
                    .collect()
            },
        ),
        transport_rule(
            "TRN-09",
            Severity::Error,
            "Route does not repeat a jurisdiction consecutively",
            &TRANSPORT,
            |_, t, ctx| {
                from_check(ctx, "transport.route", check_route_repeats(&t.route))
                    .into_iter()
                    .collect()
            },
        ),
        transport_rule(
            "TRN-10",
            Severity::Warning,
            "Route starts at the origin and ends at the destination",
            &TRANSPORT,
            |_, t, ctx| {
                let mut issues = Vec::new();
                if let (Some(first), Some(origin)) = (t.route.first(), &t.origin) {
                    if first != origin {
                        issues.push(ctx.issue(
                            "transport.route",
                            format!("route starts in {first} but the origin is {origin}"),
                        ));
                    }
                }
                if let (Some(last), Some(destination)) = (t.route.last(), &t.destination) {
                    if last != destination {
                        issues.push(ctx.issue(
                            "transport.route",
                            format!("route ends in {last} but the destination is {destination}"),
                        ));
                    }
                }
                issues
            },
        ),
        transport_rule(
            "TRN-11",
            Severity::Error,
            "Origin and destination are known UFs",
            &TRANSPORT,
            |_, t, ctx| {
                [("transport.origin", &t.origin), ("transport.destination", &t.destination)]
                    .into_iter()
                    .filter_map(|(field, uf)| {
                        let uf = uf.as_deref()?;
                        (!is_known_jurisdiction(uf)).then(|| {
                            ctx.issue(field, format!("'{uf}' is not a known jurisdiction"))
                        })
                    })
                    .collect()
            },
        ),
        transport_rule(
            "TRN-12",
            Severity::Error,
            "Manifest cargo weight is present and positive",
            &MANIFEST,
            |_, t, ctx| {
                from_check(ctx, "transport.cargo_weight", check_cargo_weight(t.cargo_weight))
                    .into_iter()
                    .collect()
            },
        ),
        transport_rule(
            "TRN-13",
            Severity::Error,
            "Dangerous cargo declares its weights",
            &TRANSPORT,
            |_, t, ctx| {
                from_check(ctx, "transport.dangerous_cargo", check_dangerous_cargo(t))
                    .into_iter()
                    .collect()
            },
        ),
    ]
}
