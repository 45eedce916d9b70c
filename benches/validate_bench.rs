use chrono::NaiveDate;
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use nota::adapters::{
    ClassificationEntry, PostalInfo, StaticPostalCodes, StaticTaxpayers, TaxpayerStatus,
};
use nota::checksum::{check_access_key, check_cnpj, check_registration};
use nota::core::*;
use nota::engine::{ValidateOptions, Validator};

const NFE_KEY: &str = "35240611222333000181550010000012341000056786";

fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

fn build_invoice(items: u32) -> DocumentRecord {
    let issuer = PartyBuilder::new("11222333000181", "ACME Comercio Ltda", "SP")
        .state_registration("110042490114")
        .postal_code("01310-100")
        .municipality("São Paulo")
        .build();
    let recipient = PartyBuilder::new("33987654000100", "Beta Distribuidora S.A.", "RJ")
        .postal_code("20040-020")
        .municipality("Rio de Janeiro")
        .build();

    let mut builder = DocumentBuilder::new(DocumentCategory::Invoice, NFE_KEY, issuer)
        .number(1234)
        .issue_date(test_date())
        .recipient(recipient)
        .tax_regime(TaxRegime::Normal);

    for i in 1..=items {
        let gross = dec!(3) * dec!(19.90);
        builder = builder.add_item(
            LineItemBuilder::new(i, format!("SKU-{i:05}"), dec!(3), dec!(19.90))
                .classification("07032090")
                .operation("6102")
                .icms(gross, dec!(12))
                .build(),
        );
    }
    builder.build()
}

fn online_validator() -> Validator {
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
            name: "BETA DISTRIBUIDORA SA".into(),
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
    Validator::builder()
        .taxpayer_source(registry)
        .postal_source(postal)
        .classification_table(vec![ClassificationEntry::new("07032090", "Alhos, outros")])
        .build()
        .unwrap()
}

// ── Checksums ──────────────────────────────────────────────────────

fn bench_checksums(c: &mut Criterion) {
    c.bench_function("check_cnpj", |b| {
        b.iter(|| black_box(check_cnpj(black_box("11222333000181"))));
    });
    c.bench_function("check_access_key", |b| {
        b.iter(|| black_box(check_access_key(black_box(NFE_KEY))));
    });
    c.bench_function("check_registration_sp", |b| {
        b.iter(|| black_box(check_registration(black_box("SP"), black_box("110042490114"))));
    });
}

// ── Validation ─────────────────────────────────────────────────────

fn bench_validate_offline(c: &mut Criterion) {
    let validator = Validator::new().unwrap();
    let invoice = build_invoice(10);
    let options = ValidateOptions::default();
    c.bench_function("validate_offline_10_items", |b| {
        b.iter(|| black_box(validator.validate(black_box(&invoice), &options)));
    });
}

fn bench_validate_cached_external(c: &mut Criterion) {
    let validator = online_validator();
    let invoice = build_invoice(10);
    let options = ValidateOptions::new().external(true);
    // warm every cache
    validator.validate(&invoice, &options);
    c.bench_function("validate_external_cached_10_items", |b| {
        b.iter(|| black_box(validator.validate(black_box(&invoice), &options)));
    });
}

fn bench_validate_1000_items(c: &mut Criterion) {
    let validator = Validator::new().unwrap();
    let invoice = build_invoice(1000);
    let options = ValidateOptions::default();
    assert_eq!(invoice.items.len(), 1000);
    assert!(invoice.totals.document_total > Decimal::ZERO);
    c.bench_function("validate_offline_1000_items", |b| {
        b.iter(|| black_box(validator.validate(black_box(&invoice), &options)));
    });
}

criterion_group!(
    benches,
    bench_checksums,
    bench_validate_offline,
    bench_validate_cached_external,
    bench_validate_1000_items,
);
criterion_main!(benches);
