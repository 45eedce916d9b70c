//! Property-based tests for the check-digit algorithms and the validator.
//!
//! Run with: `cargo test --test proptest_tests`

use nota::checksum::*;
use nota::core::*;
use nota::engine::{ValidateOptions, Validator};
use proptest::prelude::*;
use rust_decimal::Decimal;

const CNPJ_WEIGHTS_1: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
const CNPJ_WEIGHTS_2: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

fn digits(s: &str) -> Vec<u32> {
    s.bytes().map(|b| u32::from(b - b'0')).collect()
}

fn remainder(digits: &[u32], weights: &[u32]) -> u32 {
    digits.iter().zip(weights).map(|(d, w)| d * w).sum::<u32>() % 11
}

/// Both mod-11 remainders of a CNPJ, the second computed over the base plus
/// its actual first check digit.
fn cnpj_remainders(cnpj: &str) -> (u32, u32) {
    let d = digits(cnpj);
    (remainder(&d[..12], &CNPJ_WEIGHTS_1), remainder(&d[..13], &CNPJ_WEIGHTS_2))
}

fn all_equal(s: &str) -> bool {
    s.bytes().all(|b| b == s.as_bytes()[0])
}

fn with_cnpj_digits(base: &str) -> String {
    let [d1, d2] = cnpj_check_digits(base).unwrap();
    format!("{base}{d1}{d2}")
}

fn with_cpf_digits(base: &str) -> String {
    let [d1, d2] = cpf_check_digits(base).unwrap();
    format!("{base}{d1}{d2}")
}

fn replace_digit(s: &str, pos: usize, digit: u8) -> String {
    let mut bytes = s.as_bytes().to_vec();
    bytes[pos] = b'0' + digit;
    String::from_utf8(bytes).unwrap()
}

/// Everyday amounts mixed with values at the edge of the `Decimal` range.
fn amount() -> impl Strategy<Value = Decimal> {
    prop_oneof![
        4 => (0i64..10_000_000).prop_map(|cents| Decimal::new(cents, 2)),
        1 => Just(Decimal::MAX),
        1 => Just(Decimal::MIN),
        1 => (any::<u32>(), any::<u32>(), any::<u32>(), any::<bool>(), 0u32..=28)
            .prop_map(|(lo, mid, hi, negative, scale)| {
                Decimal::from_parts(lo, mid, hi, negative, scale)
            }),
    ]
}

proptest! {
    #[test]
    fn generated_cnpj_is_valid(base in "[0-9]{12}") {
        let cnpj = with_cnpj_digits(&base);
        prop_assume!(!all_equal(&cnpj));
        prop_assert_eq!(check_cnpj(&cnpj), CheckResult::Valid);
        prop_assert!(check_tax_id(&cnpj).is_valid());
    }

    #[test]
    fn generated_cpf_is_valid(base in "[0-9]{9}") {
        let cpf = with_cpf_digits(&base);
        prop_assume!(!all_equal(&cpf));
        prop_assert_eq!(check_cpf(&cpf), CheckResult::Valid);
        prop_assert!(check_tax_id(&cpf).is_valid());
    }

    #[test]
    fn corrupted_check_digit_is_rejected(
        base in "[0-9]{12}",
        pos in 12usize..14,
        shift in 1u8..10,
    ) {
        let cnpj = with_cnpj_digits(&base);
        let old = cnpj.as_bytes()[pos] - b'0';
        let bad = replace_digit(&cnpj, pos, (old + shift) % 10);
        prop_assert!(!check_cnpj(&bad).is_valid());
    }

    /// A single changed base digit goes unnoticed only when the mod-11
    /// remainders collapse onto the same check digit: both the original and
    /// the corrupted value must have every remainder in {0, 1}.
    #[test]
    fn corrupted_base_digit_is_rejected_unless_remainders_collapse(
        base in "[0-9]{12}",
        pos in 0usize..12,
        shift in 1u8..10,
    ) {
        let cnpj = with_cnpj_digits(&base);
        let old = cnpj.as_bytes()[pos] - b'0';
        let bad = replace_digit(&cnpj, pos, (old + shift) % 10);
        if check_cnpj(&bad).is_valid() {
            let (a1, a2) = cnpj_remainders(&cnpj);
            let (b1, b2) = cnpj_remainders(&bad);
            prop_assert!(a1 < 2 && b1 < 2 && a2 < 2 && b2 < 2);
        }
    }

    #[test]
    fn composed_access_key_is_valid(
        uf in 11u32..54,
        number in 1u64..=999_999_999,
        series in 0u32..=999,
        code in 0u32..=99_999_999,
    ) {
        let key = compose_access_key(
            &uf.to_string(), "2406", "11222333000181", "55", series, number, 1, code,
        ).unwrap();
        prop_assert_eq!(key.len(), 44);
        prop_assert_eq!(check_access_key(&key), CheckResult::Valid);

        let parsed = AccessKey::parse(&key).unwrap();
        prop_assert_eq!(parsed.number, number);
        prop_assert_eq!(parsed.series, series);
    }

    #[test]
    fn access_key_with_other_last_digit_is_mismatch(
        prefix in "[0-9]{43}",
        shift in 1u8..10,
    ) {
        let expected = access_key_check_digit(&prefix).unwrap();
        let key = format!("{prefix}{}", (expected + shift) % 10);
        let is_mismatch = matches!(check_access_key(&key), CheckResult::Mismatch { .. });
        prop_assert!(is_mismatch);
    }

    #[test]
    fn checksums_never_panic(s in "\\PC{0,60}") {
        let _ = check_cnpj(&s);
        let _ = check_cpf(&s);
        let _ = check_tax_id(&s);
        let _ = check_access_key(&s);
        let _ = AccessKey::parse(&s);
        for uf in ["SP", "MG", "BA", "RN", "TO", "ZZ"] {
            let _ = check_registration(uf, &s);
        }
    }

    #[test]
    fn validate_never_panics(
        tax_id in "[0-9./-]{0,16}",
        key in "[0-9 ]{0,46}",
        uf in "[A-Z]{0,3}",
        registration in "[0-9A-Z.]{0,15}",
        classification in "[0-9A-Z]{0,9}",
        operation in "[0-9]{0,5}",
        quantity in amount(),
        price in amount(),
        discount in amount(),
        tax_base in amount(),
        tax_rate in amount(),
        freight in amount(),
        route in proptest::collection::vec("[A-Z]{2}", 0..5),
        category in prop_oneof![
            Just(DocumentCategory::Invoice),
            Just(DocumentCategory::TransportService),
            Just(DocumentCategory::TransportManifest),
        ],
    ) {
        let issuer = PartyBuilder::new(&tax_id, "Fuzz Ltda", &uf)
            .state_registration(&registration)
            .build();
        let record = DocumentBuilder::new(category, &key, issuer)
            .freight(freight)
            .service_icms(tax_base, tax_rate)
            .add_item(
                LineItemBuilder::new(1, "X", quantity, price)
                    .discount(discount)
                    .classification(&classification)
                    .operation(&operation)
                    .icms(tax_base, tax_rate)
                    .build(),
            )
            .add_item(LineItemBuilder::new(2, "Y", price, quantity).build())
            .transport(TransportBuilder::new("01").route(route).build())
            .build();

        let issues = Validator::new().unwrap().validate(&record, &ValidateOptions::default());
        for pair in issues.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            prop_assert!((a.severity, a.code.as_str()) <= (b.severity, b.code.as_str()));
        }
    }
}
