use std::time::Duration;

use chrono::NaiveDate;
use nota::adapters::{
    AdapterError, ClassificationEntry, PostalInfo, StaticPostalCodes, StaticTaxpayers,
    TaxpayerStatus,
};
use nota::core::*;
use nota::engine::{Rule, ValidateOptions, Validator};
use rust_decimal_macros::dec;

fn main() -> Result<(), EngineError> {
    let issuer = PartyBuilder::new("11222333000181", "ACME Comercio Ltda", "SP")
        .state_registration("110042490114")
        .postal_code("01310-100")
        .municipality("São Paulo")
        .build();
    let recipient = PartyBuilder::new("33987654000100", "Beta Distribuidora S.A.", "RJ")
        .postal_code("20040-020")
        .municipality("Rio de Janeiro")
        .build();

    // Intrastate operation code on an interstate sale, and a short NCM
    let invoice = DocumentBuilder::new(
        DocumentCategory::Invoice,
        "35240611222333000181550010000012341000056786",
        issuer,
    )
    .number(1234)
    .issue_date(NaiveDate::from_ymd_opt(2024, 6, 15).expect("valid date"))
    .recipient(recipient)
    .tax_regime(TaxRegime::Normal)
    .add_item(
        LineItemBuilder::new(1, "P-001", dec!(10), dec!(15.50))
            .classification("0703209")
            .operation("5102")
            .icms(dec!(155), dec!(12))
            .build(),
    )
    .build();

    // Offline: checksums, consistency, and totals only
    let validator = Validator::new()?;
    let issues = validator.validate(&invoice, &ValidateOptions::default());
    println!("Offline validation: {} issues", issues.len());
    for issue in &issues {
        println!("  {issue}");
    }

    // Online: the registry disagrees with the declared name, and the
    // classification source is down
    let registry = StaticTaxpayers::new()
        .with(TaxpayerStatus {
            tax_id: "11222333000181".into(),
            active: true,
            name: "ACME COMERCIO LTDA".into(),
            jurisdiction: Some("SP".into()),
        })
        .with(TaxpayerStatus {
            tax_id: "33987654000100".into(),
            active: true,
            name: "GAMMA LOGISTICA SA".into(),
            jurisdiction: Some("RJ".into()),
        });
    let postal = StaticPostalCodes::new()
        .with(PostalInfo {
            postal_code: "01310100".into(),
            municipality: "São Paulo".into(),
            jurisdiction: "SP".into(),
        })
        .with(PostalInfo {
            postal_code: "20040020".into(),
            municipality: "Rio de Janeiro".into(),
            jurisdiction: "RJ".into(),
        });
    let unreachable = |_: &str, t: Duration| -> Result<Option<ClassificationEntry>, AdapterError> {
        Err(AdapterError::Timeout(t))
    };

    let mut validator = Validator::builder()
        .taxpayer_source(registry)
        .postal_source(postal)
        .classification_source(unreachable)
        .build()?;

    // Local policy rule
    validator.register_rule(Rule::new(
        "LOC-01",
        Severity::Info,
        "Invoices above R$ 100 need a second approver",
        |record, ctx| {
            if record.totals.document_total > dec!(100) {
                vec![ctx.issue("totals.document_total", "needs a second approver")]
            } else {
                Vec::new()
            }
        },
    ))?;

    let issues = validator.validate(&invoice, &ValidateOptions::new().external(true));
    println!("\nOnline validation: {} issues", issues.len());
    for issue in &issues {
        println!("  {issue}");
    }

    println!("\nRegistered rules:");
    for info in validator.list_rules() {
        println!("  {} [{}] {}", info.code, info.severity, info.description);
    }
    Ok(())
}
